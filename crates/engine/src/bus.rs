// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The event bus: multi-pattern subscription with ordered, synchronous,
//! depth-first fan-out, plus a running history buffer.
//!
//! Listeners are synchronous by contract (see `Listener`); a listener that
//! needs to start async work hands it to the scheduler instead of awaiting
//! inline. `emit` snapshots the matching listeners under a short lock hold
//! and releases the lock before invoking them, so a listener that itself
//! calls `emit` (a reducer re-emitting a derived event, for instance)
//! re-enters safely instead of deadlocking. A listener that panics is
//! caught and logged rather than allowed to unwind through the bus and
//! take down whatever triggered the emit.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;
use skein_core::{Event, PatternSet};

pub type SubscriptionId = u64;

/// A listener invoked synchronously for every event matching its patterns.
pub type Listener = Arc<dyn Fn(&Event) + Send + Sync>;

struct Subscription {
    id: SubscriptionId,
    patterns: PatternSet,
    listener: Listener,
}

struct BusState {
    subscriptions: Vec<Subscription>,
    history: Vec<Event>,
    next_id: SubscriptionId,
}

/// Synchronous pub/sub over colon-segmented event names.
pub struct EventBus {
    state: Mutex<BusState>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BusState {
                subscriptions: Vec::new(),
                history: Vec::new(),
                next_id: 0,
            }),
        }
    }

    /// Subscribes `listener` to every event matching any of `patterns`.
    /// Returns an id usable with `unsubscribe`.
    pub fn subscribe(
        &self,
        patterns: impl IntoIterator<Item = impl Into<String>>,
        listener: Listener,
    ) -> SubscriptionId {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.subscriptions.push(Subscription {
            id,
            patterns: PatternSet::compile(patterns),
            listener,
        });
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut state = self.state.lock();
        state.subscriptions.retain(|s| s.id != id);
    }

    /// Appends `event` to the history and synchronously notifies every
    /// matching listener, in subscription order.
    pub fn emit(&self, event: Event) {
        let matching: Vec<Listener> = {
            let mut state = self.state.lock();
            state.history.push(event.clone());
            state
                .subscriptions
                .iter()
                .filter(|s| s.patterns.matches(&event.name))
                .map(|s| s.listener.clone())
                .collect()
        };
        for listener in matching {
            if catch_unwind(AssertUnwindSafe(|| listener(&event))).is_err() {
                tracing::error!(event = %event.name, "listener panicked");
            }
        }
    }

    /// The full ordered history of events emitted so far.
    pub fn history(&self) -> Vec<Event> {
        self.state.lock().history.clone()
    }

    pub fn subscription_count(&self) -> usize {
        self.state.lock().subscriptions.len()
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
