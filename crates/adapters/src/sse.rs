// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Republishes matched signals onto a `broadcast` channel, for an HTTP
//! layer to fan out to SSE/WebSocket subscribers. Slow subscribers lag and
//! drop the oldest events rather than stall the run.

use async_trait::async_trait;
use skein_core::{Event, PatternSet};
use tokio::sync::broadcast;

use crate::adapter::{Adapter, AdapterError};

const DEFAULT_CAPACITY: usize = 256;

pub struct SseAdapter {
    name: String,
    patterns: PatternSet,
    sender: broadcast::Sender<Event>,
}

impl SseAdapter {
    pub fn new(patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::with_capacity(patterns, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(
        patterns: impl IntoIterator<Item = impl Into<String>>,
        capacity: usize,
    ) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            name: "sse".to_string(),
            patterns: PatternSet::compile(patterns),
            sender,
        }
    }

    /// Subscribes a new client to the republished signal stream.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl Adapter for SseAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    async fn on_signal(&self, event: &Event) -> Result<(), AdapterError> {
        // No error when there are no subscribers: that's the common case
        // between the run starting and a client connecting.
        let _ = self.sender.send(event.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "sse_tests.rs"]
mod tests;
