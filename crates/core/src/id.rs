// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ID generation abstractions

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Trait for truncating identifiers to a short prefix.
pub trait ShortId {
    /// Returns a string slice truncated to at most `n` characters.
    fn short(&self, n: usize) -> &str;
}

impl ShortId for str {
    fn short(&self, n: usize) -> &str {
        if self.len() <= n {
            self
        } else {
            &self[..n]
        }
    }
}

/// Generates event identifiers.
///
/// IDs must be unique within a run and, per the causal-ordering invariant,
/// lexicographically sortable in generation order (timestamps alone are not
/// sufficient: two events in the same millisecond must still compare
/// correctly).
pub trait IdGen: Send + Sync {
    fn next(&self) -> String;
}

/// Zero-padded counter + random suffix, sortable as a plain string.
///
/// The counter is wide enough (20 digits) that it never wraps in practice;
/// the random suffix only exists to make IDs unguessable across restarts
/// with a fresh counter, not to provide uniqueness (the counter already
/// guarantees that within a process).
pub struct MonotonicIdGen {
    prefix: String,
    counter: AtomicU64,
}

impl MonotonicIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl Default for MonotonicIdGen {
    fn default() -> Self {
        Self::new("ev")
    }
}

impl IdGen for MonotonicIdGen {
    fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let suffix: u16 = rand::random();
        format!("{}-{n:020}-{suffix:04x}", self.prefix)
    }
}

/// Sequential ID generator for testing. Shareable across clones (the
/// counter is behind an `Arc`), so a single generator can be cloned into
/// multiple collaborators and still hand out a strictly increasing sequence.
#[derive(Clone)]
pub struct SequentialIdGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
