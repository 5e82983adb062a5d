// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Adapter` contract: external sinks subscribed to a set of event
//! patterns, with a start/stop lifecycle around delivery.

use async_trait::async_trait;
use skein_core::{Event, PatternSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("send failed: {0}")]
    SendFailed(String),
}

/// An external sink wired to the event bus under `patterns()`.
///
/// The workflow factory isolates adapter errors: a failing `on_signal` or
/// `on_stop` is logged and does not abort the run.
#[async_trait]
pub trait Adapter: Send + Sync {
    fn name(&self) -> &str;

    fn patterns(&self) -> &PatternSet;

    async fn on_start(&self) -> Result<(), AdapterError> {
        Ok(())
    }

    async fn on_signal(&self, event: &Event) -> Result<(), AdapterError>;

    async fn on_stop(&self) -> Result<(), AdapterError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
