// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! skein-engine: the reactive runtime. Wires the event bus, the
//! copy-on-write state box, the update pipeline, the activation scheduler,
//! the harness driver and replayer, the recorder, and adapter lifecycle
//! management into one `WorkflowFactory::run_reactive` entry point.

mod adapter_runtime;
mod bus;
mod error;
mod harness_driver;
mod pipeline;
mod recorder;
mod replayer;
mod scheduler;
mod state_box;
mod workflow;

pub use adapter_runtime::AdapterRuntime;
pub use bus::{EventBus, Listener, SubscriptionId};
pub use error::RunError;
pub use harness_driver::HarnessOutcome;
pub use pipeline::{Handler, ProcessManager, Reducer, UpdatePipeline};
pub use recorder::Recorder;
pub use replayer::Replayer;
pub use scheduler::{ActivationScheduler, TerminationInfo};
pub use state_box::StateBox;
pub use workflow::{RunConfig, RunMetrics, RunMode, RunResult, WorkflowFactory};
