// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: the `Harness` seam that drives agent
//! activations, and the `Adapter` seam that fans signals out to sinks.

mod adapter;
mod harness;
mod log;
mod sse;
mod terminal;

pub use adapter::{Adapter, AdapterError};
pub use harness::{Harness, HarnessError, HarnessOutput, HarnessRequest};
pub use log::LogAdapter;
pub use sse::SseAdapter;
pub use terminal::TerminalAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake_adapter;
#[cfg(any(test, feature = "test-support"))]
mod fake_harness;
#[cfg(any(test, feature = "test-support"))]
pub use fake_adapter::{AdapterCall, FakeAdapter};
#[cfg(any(test, feature = "test-support"))]
pub use fake_harness::{FakeHarness, HarnessCall};
