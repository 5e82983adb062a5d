// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the workflow engine

use skein_adapters::{AdapterError, HarnessError};
use skein_storage::StoreError;
use thiserror::Error;

/// Errors that can occur while running a workflow.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("run timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("harness error: {0}")]
    Harness(#[from] HarnessError),

    #[error("adapter error: {0}")]
    Adapter(#[from] AdapterError),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("recording not found: {0}")]
    RecordingNotFound(String),

    #[error("recording exhausted during replay: no harness sequence remains for {agent}")]
    ReplayExhausted { agent: String },

    #[error("aborted: {reason}")]
    Aborted { reason: String },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
