// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake adapter for asserting on lifecycle and delivery order in tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use skein_core::{Event, PatternSet};

use crate::adapter::{Adapter, AdapterError};

#[derive(Debug, Clone, PartialEq)]
pub enum AdapterCall {
    Start,
    Signal(String),
    Stop,
}

#[derive(Clone)]
pub struct FakeAdapter {
    name: String,
    patterns: PatternSet,
    calls: Arc<Mutex<Vec<AdapterCall>>>,
    fail_on_signal: Arc<Mutex<bool>>,
}

impl FakeAdapter {
    pub fn new(name: impl Into<String>, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            patterns: PatternSet::compile(patterns),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_on_signal: Arc::new(Mutex::new(false)),
        }
    }

    pub fn calls(&self) -> Vec<AdapterCall> {
        self.calls.lock().clone()
    }

    /// Makes every subsequent `on_signal` call return an error, to exercise
    /// the workflow factory's adapter error isolation.
    pub fn fail_on_signal(&self) {
        *self.fail_on_signal.lock() = true;
    }
}

#[async_trait]
impl Adapter for FakeAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    async fn on_start(&self) -> Result<(), AdapterError> {
        self.calls.lock().push(AdapterCall::Start);
        Ok(())
    }

    async fn on_signal(&self, event: &Event) -> Result<(), AdapterError> {
        self.calls.lock().push(AdapterCall::Signal(event.name.clone()));
        if *self.fail_on_signal.lock() {
            return Err(AdapterError::SendFailed("fake failure".into()));
        }
        Ok(())
    }

    async fn on_stop(&self) -> Result<(), AdapterError> {
        self.calls.lock().push(AdapterCall::Stop);
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_adapter_tests.rs"]
mod tests;
