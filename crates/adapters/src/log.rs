// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Forwards every matched signal to `tracing` as a structured event.

use async_trait::async_trait;
use skein_core::{Event, PatternSet};

use crate::adapter::{Adapter, AdapterError};

pub struct LogAdapter {
    name: String,
    patterns: PatternSet,
}

impl LogAdapter {
    pub fn new(patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: "log".to_string(),
            patterns: PatternSet::compile(patterns),
        }
    }
}

#[async_trait]
impl Adapter for LogAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    async fn on_signal(&self, event: &Event) -> Result<(), AdapterError> {
        tracing::info!(signal = %event.name, payload = %event.payload, "signal");
        Ok(())
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
