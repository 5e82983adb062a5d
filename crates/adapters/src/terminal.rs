// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Writes every matched signal as one line to a writer (stdout by default).

use std::io::{self, Write};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use skein_core::{Event, PatternSet};

use crate::adapter::{Adapter, AdapterError};

pub struct TerminalAdapter {
    name: String,
    patterns: PatternSet,
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl TerminalAdapter {
    /// Writes matching signals to stdout.
    pub fn new(patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::with_sink(patterns, Box::new(io::stdout()))
    }

    /// Writes matching signals to a caller-supplied sink (tests use this to
    /// capture output instead of stdout).
    pub fn with_sink(
        patterns: impl IntoIterator<Item = impl Into<String>>,
        sink: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            name: "terminal".to_string(),
            patterns: PatternSet::compile(patterns),
            sink: Arc::new(Mutex::new(sink)),
        }
    }
}

#[async_trait]
impl Adapter for TerminalAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    async fn on_signal(&self, event: &Event) -> Result<(), AdapterError> {
        let mut sink = self.sink.lock();
        writeln!(sink, "[{}] {}", event.name, event.payload)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "terminal_tests.rs"]
mod tests;
