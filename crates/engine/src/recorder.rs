// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Records a live run: buffers every emitted event in memory, then flushes
//! it to a `SignalStore` once the run ends.

use std::sync::Arc;

use parking_lot::Mutex;
use skein_core::Event;
use skein_storage::SignalStore;

use crate::bus::EventBus;
use crate::error::RunError;

pub struct Recorder {
    store: Arc<dyn SignalStore>,
    recording_id: String,
    buffer: Mutex<Vec<Event>>,
}

impl Recorder {
    /// Creates a new recording in `store` and returns a `Recorder` ready to
    /// be installed onto a bus.
    pub async fn start(
        store: Arc<dyn SignalStore>,
        name: Option<String>,
        tags: Vec<String>,
        created_at_ms: u64,
    ) -> Result<Self, RunError> {
        let recording_id = store.create(name, tags, created_at_ms).await?;
        Ok(Self {
            store,
            recording_id,
            buffer: Mutex::new(Vec::new()),
        })
    }

    pub fn recording_id(&self) -> &str {
        &self.recording_id
    }

    /// Subscribes to every event on `bus` and buffers it for later flush.
    pub fn install(self: &Arc<Self>, bus: &EventBus) {
        let recorder = self.clone();
        bus.subscribe(
            ["**"],
            Arc::new(move |event: &Event| {
                recorder.buffer.lock().push(event.clone());
            }),
        );
    }

    /// Flushes the buffered events and finalizes the recording. Called once,
    /// on `workflow:end`.
    pub async fn finish(&self, duration_ms: u64) -> Result<(), RunError> {
        let events = std::mem::take(&mut *self.buffer.lock());
        if !events.is_empty() {
            self.store.append_batch(&self.recording_id, events).await?;
        }
        self.store.finalize(&self.recording_id, duration_ms).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "recorder_tests.rs"]
mod tests;
