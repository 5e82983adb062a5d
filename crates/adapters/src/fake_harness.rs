// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake harness for deterministic testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use skein_core::Event;
use tokio::sync::mpsc;

use crate::harness::{Harness, HarnessError, HarnessOutput, HarnessRequest};

/// One recorded call to `FakeHarness::run`.
#[derive(Debug, Clone)]
pub struct HarnessCall {
    pub agent: String,
    pub prompt: String,
}

#[derive(Clone)]
struct Script {
    events: Vec<Event>,
    output: String,
    structured_output: Option<Value>,
}

/// Scriptable `Harness` double: register a canned response per agent name
/// (or a default for any agent), then assert on the calls it recorded.
#[derive(Clone)]
pub struct FakeHarness {
    inner: Arc<Mutex<FakeState>>,
}

struct FakeState {
    calls: Vec<HarnessCall>,
    scripts: HashMap<String, Script>,
    default_script: Option<Script>,
    error: Option<String>,
}

impl Default for FakeHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeHarness {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeState {
                calls: Vec::new(),
                scripts: HashMap::new(),
                default_script: None,
                error: None,
            })),
        }
    }

    /// Scripts the response for activations of a specific agent.
    pub fn script_for(
        &self,
        agent: impl Into<String>,
        events: Vec<Event>,
        output: impl Into<String>,
        structured_output: Option<Value>,
    ) {
        self.inner.lock().scripts.insert(
            agent.into(),
            Script {
                events,
                output: output.into(),
                structured_output,
            },
        );
    }

    /// Scripts the response used when no agent-specific script matches.
    pub fn script_default(
        &self,
        events: Vec<Event>,
        output: impl Into<String>,
        structured_output: Option<Value>,
    ) {
        self.inner.lock().default_script = Some(Script {
            events,
            output: output.into(),
            structured_output,
        });
    }

    /// Makes the next `run` call fail with `HarnessError::SpawnFailed(reason)`.
    pub fn fail_next(&self, reason: impl Into<String>) {
        self.inner.lock().error = Some(reason.into());
    }

    pub fn calls(&self) -> Vec<HarnessCall> {
        self.inner.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().calls.len()
    }
}

#[async_trait]
impl Harness for FakeHarness {
    async fn run(
        &self,
        request: HarnessRequest,
        event_tx: mpsc::Sender<Event>,
    ) -> Result<HarnessOutput, HarnessError> {
        let script = {
            let mut inner = self.inner.lock();
            inner.calls.push(HarnessCall {
                agent: request.agent.clone(),
                prompt: request.prompt.clone(),
            });
            if let Some(reason) = inner.error.take() {
                return Err(HarnessError::SpawnFailed(reason));
            }
            inner
                .scripts
                .get(&request.agent)
                .or(inner.default_script.as_ref())
                .cloned()
        };

        let Some(script) = script else {
            return Ok(HarnessOutput {
                output: String::new(),
                structured_output: None,
            });
        };

        for event in script.events {
            if event_tx.send(event).await.is_err() {
                return Err(HarnessError::SendFailed("event receiver dropped".into()));
            }
        }

        Ok(HarnessOutput {
            output: script.output,
            structured_output: script.structured_output,
        })
    }
}

#[cfg(test)]
#[path = "fake_harness_tests.rs"]
mod tests;
