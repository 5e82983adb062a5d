// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter lifecycle: starts every adapter, wires each to the bus under its
//! own patterns, and tears them all down at run end. Adapter errors are
//! isolated here — logged, never propagated to the run.

use std::sync::Arc;

use skein_adapters::Adapter;
use skein_core::Event;

use crate::bus::{EventBus, SubscriptionId};

pub struct AdapterRuntime {
    adapters: Vec<Arc<dyn Adapter>>,
}

impl AdapterRuntime {
    pub fn new(adapters: Vec<Arc<dyn Adapter>>) -> Self {
        Self { adapters }
    }

    /// Starts every adapter and subscribes it to the bus. `on_signal` is
    /// dispatched as a detached task rather than awaited inline, since bus
    /// listeners are synchronous; a failing delivery is logged only.
    pub async fn start(&self, bus: &Arc<EventBus>) -> Vec<SubscriptionId> {
        for adapter in &self.adapters {
            if let Err(err) = adapter.on_start().await {
                tracing::warn!(adapter = adapter.name(), error = %err, "adapter on_start failed");
            }
        }

        let mut subscription_ids = Vec::with_capacity(self.adapters.len());
        for adapter in &self.adapters {
            let adapter = adapter.clone();
            let patterns: Vec<String> = adapter
                .patterns()
                .patterns()
                .iter()
                .map(|p| p.as_str().to_string())
                .collect();
            let id = bus.subscribe(
                patterns,
                Arc::new(move |event: &Event| {
                    let adapter = adapter.clone();
                    let event = event.clone();
                    tokio::spawn(async move {
                        if let Err(err) = adapter.on_signal(&event).await {
                            tracing::warn!(
                                adapter = adapter.name(),
                                error = %err,
                                "adapter on_signal failed"
                            );
                        }
                    });
                }),
            );
            subscription_ids.push(id);
        }
        subscription_ids
    }

    /// Unsubscribes every adapter and awaits its `on_stop`. Always runs,
    /// even when the run ended in error or timeout.
    pub async fn stop(&self, bus: &EventBus, subscription_ids: &[SubscriptionId]) {
        for id in subscription_ids {
            bus.unsubscribe(*id);
        }
        for adapter in &self.adapters {
            if let Err(err) = adapter.on_stop().await {
                tracing::warn!(adapter = adapter.name(), error = %err, "adapter on_stop failed");
            }
        }
    }
}

#[cfg(test)]
#[path = "adapter_runtime_tests.rs"]
mod tests;
