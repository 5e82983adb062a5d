// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracks in-flight agent activations and the run's termination state.
//!
//! Activations run as independent tokio tasks; the scheduler only tracks
//! how many are outstanding (for quiescence) and whether the run has been
//! asked to stop taking new ones (via `endWhen` or an external abort).
//! Because a settling activation can synchronously trigger more
//! activations before the drain loop next wakes, `drain_until_quiescent`
//! is a loop, not a single wait.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;

#[derive(Debug, Clone)]
pub struct TerminationInfo {
    pub reason: String,
    pub agent: String,
}

pub struct ActivationScheduler {
    pending: AtomicU64,
    activation_count: AtomicU64,
    notify: Notify,
    terminated: AtomicBool,
    termination: Mutex<Option<TerminationInfo>>,
    aborted: AtomicBool,
}

impl Default for ActivationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivationScheduler {
    pub fn new() -> Self {
        Self {
            pending: AtomicU64::new(0),
            activation_count: AtomicU64::new(0),
            notify: Notify::new(),
            terminated: AtomicBool::new(false),
            termination: Mutex::new(None),
            aborted: AtomicBool::new(false),
        }
    }

    /// Spawns `fut` as a tracked activation. Counted against both the
    /// pending set (for quiescence) and the run's total activation count
    /// (for `RunMetrics`).
    pub fn spawn(self: &Arc<Self>, fut: impl Future<Output = ()> + Send + 'static) {
        self.pending.fetch_add(1, Ordering::SeqCst);
        self.activation_count.fetch_add(1, Ordering::SeqCst);
        let scheduler = self.clone();
        tokio::spawn(async move {
            fut.await;
            scheduler.pending.fetch_sub(1, Ordering::SeqCst);
            scheduler.notify.notify_one();
        });
    }

    pub fn pending_count(&self) -> u64 {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn activation_count(&self) -> u64 {
        self.activation_count.load(Ordering::SeqCst)
    }

    /// Marks the run terminated. Returns `true` the first time this is
    /// called (so the caller knows whether to emit `workflow:terminating`);
    /// subsequent calls are no-ops.
    pub fn mark_terminated(&self, reason: impl Into<String>, agent: impl Into<String>) -> bool {
        if self.terminated.swap(true, Ordering::SeqCst) {
            return false;
        }
        *self.termination.lock() = Some(TerminationInfo {
            reason: reason.into(),
            agent: agent.into(),
        });
        true
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }

    pub fn termination_info(&self) -> Option<TerminationInfo> {
        self.termination.lock().clone()
    }

    /// Signals external cancellation. Same effect as termination on new
    /// activations; callers surface the distinction in the run result.
    pub fn request_abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }

    /// Whether a new activation should be skipped rather than launched.
    pub fn should_skip_activation(&self) -> bool {
        self.is_terminated() || self.is_aborted()
    }

    /// Waits until there are no outstanding activations. Race-free against
    /// a completion landing between the check and the wait: `notified()`
    /// is created before the check, so a `notify_one` in that gap is not
    /// lost.
    pub async fn drain_until_quiescent(&self) {
        loop {
            let notified = self.notify.notified();
            if self.pending.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
