// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Harness` contract: the seam between an agent activation and
//! whatever drives it (an LLM API, a CLI subprocess, a scripted replay).

use async_trait::async_trait;
use serde_json::Value;
use skein_core::Event;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors from driving a harness.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("spawn failed: {0}")]
    SpawnFailed(String),

    #[error("send failed: {0}")]
    SendFailed(String),
}

/// What an agent activation asks its harness to do.
#[derive(Debug, Clone)]
pub struct HarnessRequest {
    pub agent: String,
    pub prompt: String,
    pub schema: Option<Value>,
}

/// What a harness hands back once it completes.
#[derive(Debug, Clone)]
pub struct HarnessOutput {
    pub output: String,
    pub structured_output: Option<Value>,
}

/// Drives one agent activation.
///
/// Implementations stream intermediate events (`harness:start`,
/// `text:delta`, `tool:call`, `harness:end`, ...) through `event_tx` as they
/// happen, and resolve with the final output once the underlying model or
/// process finishes. The scheduler, not the harness, owns timeouts.
#[async_trait]
pub trait Harness: Send + Sync {
    async fn run(
        &self,
        request: HarnessRequest,
        event_tx: mpsc::Sender<Event>,
    ) -> Result<HarnessOutput, HarnessError>;
}

#[cfg(test)]
#[path = "harness_tests.rs"]
mod tests;
