// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Replays a recorded run instead of driving a live harness. A single
//! `Replayer` is shared across every activation in a replay-mode run: its
//! cursor advances monotonically, and each activation consumes the next
//! harness sequence in recording order.

use parking_lot::Mutex;
use serde_json::Value;
use skein_core::Recording;

use crate::bus::EventBus;
use crate::error::RunError;
use crate::harness_driver::{resolve_structured_output, HarnessOutcome};

pub struct Replayer {
    recording: Recording,
    cursor: Mutex<usize>,
}

impl Replayer {
    pub fn new(recording: Recording) -> Self {
        Self {
            recording,
            cursor: Mutex::new(0),
        }
    }

    /// Replays the next harness sequence in the recording onto `bus` in
    /// place of a live activation for `agent`. `schema_declared` selects the
    /// same JSON-fallback rule the live harness driver uses.
    pub fn replay_next(
        &self,
        agent: &str,
        schema_declared: bool,
        bus: &EventBus,
    ) -> Result<HarnessOutcome, RunError> {
        let mut cursor = self.cursor.lock();
        let events = &self.recording.events;

        let mut index = *cursor;
        while index < events.len() && !events[index].is_harness_family() {
            index += 1;
        }
        if index >= events.len() {
            return Err(RunError::ReplayExhausted {
                agent: agent.to_string(),
            });
        }

        let mut harness_end_payload: Option<Value> = None;
        while index < events.len() {
            let event = events[index].clone();
            let is_end = event.is_harness_end();
            index += 1;
            if is_end {
                harness_end_payload = Some(event.payload.clone());
                bus.emit(event);
                break;
            }
            bus.emit(event);
        }
        *cursor = index;

        let Some(payload) = harness_end_payload else {
            return Err(RunError::ReplayExhausted {
                agent: agent.to_string(),
            });
        };

        let output = payload
            .get("output")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let provided = payload.get("structuredOutput").cloned();
        let structured_output = resolve_structured_output(schema_declared, provided, &output);

        Ok(HarnessOutcome {
            output,
            structured_output,
        })
    }
}

#[cfg(test)]
#[path = "replayer_tests.rs"]
mod tests;
