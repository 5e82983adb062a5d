// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Copy-on-write workflow state: readers see a frozen `Arc<S>` snapshot,
//! writers run a mutator against a private clone and the result becomes the
//! new committed value atomically.

use std::sync::Arc;

use parking_lot::Mutex;

pub struct StateBox<S> {
    current: Mutex<Arc<S>>,
}

impl<S: Clone> StateBox<S> {
    pub fn new(initial: S) -> Self {
        Self {
            current: Mutex::new(Arc::new(initial)),
        }
    }

    /// The latest committed snapshot. Cheap: clones the `Arc`, not `S`.
    pub fn get(&self) -> Arc<S> {
        self.current.lock().clone()
    }

    /// Clones the current value, runs `mutate` against the clone, and
    /// commits the result as the new snapshot. Returns the new snapshot.
    ///
    /// `mutate` must not itself call `update` on the same box: the lock is
    /// only held briefly around the read and the commit, not across
    /// `mutate`, so a nested call would read a stale base and its write
    /// would be clobbered by the outer commit. The update pipeline honors
    /// this by keeping state mutation and event emission as separate
    /// stages.
    pub fn update(&self, mutate: impl FnOnce(&mut S)) -> Arc<S> {
        let mut draft = (*self.get()).clone();
        mutate(&mut draft);
        let committed = Arc::new(draft);
        *self.current.lock() = committed.clone();
        committed
    }
}

#[cfg(test)]
#[path = "state_box_tests.rs"]
mod tests;
