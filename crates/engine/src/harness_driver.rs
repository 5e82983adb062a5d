// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drives one live activation: expands the agent's prompt template,
//! invokes the harness, forwards every event it yields onto the bus
//! unchanged, and extracts the structured output once it settles.

use std::sync::Arc;

use serde::Serialize;
use skein_adapters::{Harness, HarnessRequest};
use skein_core::{expand_template, extract_json, AgentContext, AgentDef, TemplateVars};
use tokio::sync::mpsc;

use crate::bus::EventBus;
use crate::error::RunError;

pub struct HarnessOutcome {
    pub output: String,
    pub structured_output: Option<serde_json::Value>,
}

fn build_request<S: Serialize>(
    agent: &AgentDef<S>,
    ctx: &AgentContext<'_, S>,
) -> Result<HarnessRequest, RunError> {
    let state_value =
        serde_json::to_value(ctx.state).map_err(|e| RunError::Config(e.to_string()))?;
    let vars = TemplateVars {
        state: &state_value,
        signal_name: &ctx.event.name,
        signal_payload: &ctx.event.payload,
        input: ctx.input,
    };
    let prompt = expand_template(&agent.prompt.render(ctx), &vars);
    Ok(HarnessRequest {
        agent: agent.name.clone(),
        prompt,
        schema: agent.schema.clone(),
    })
}

/// Runs `agent`'s activation to completion against `harness`, forwarding
/// every intermediate event onto `bus` as it arrives.
pub async fn drive<S: Serialize>(
    agent: &AgentDef<S>,
    ctx: &AgentContext<'_, S>,
    harness: &(dyn Harness),
    bus: &Arc<EventBus>,
) -> Result<HarnessOutcome, RunError> {
    let request = build_request(agent, ctx)?;

    let (tx, mut rx) = mpsc::channel(64);
    let bus_handle = bus.clone();
    let forward = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            bus_handle.emit(event);
        }
    });

    let output = harness.run(request, tx).await?;
    let _ = forward.await;

    let structured_output = resolve_structured_output(
        agent.schema.is_some(),
        output.structured_output,
        &output.output,
    );

    Ok(HarnessOutcome {
        output: output.output,
        structured_output,
    })
}

/// The JSON-fallback rule shared by live activation and replay: prefer a
/// structured output the harness handed back directly when a schema was
/// declared, otherwise attempt best-effort extraction from the text. An
/// agent that declared no schema never gets an inferred structured output,
/// even if its text happens to contain something JSON-shaped.
pub(crate) fn resolve_structured_output(
    schema_declared: bool,
    provided: Option<serde_json::Value>,
    output: &str,
) -> Option<serde_json::Value> {
    if !schema_declared {
        return None;
    }
    provided.or_else(|| extract_json(output))
}

#[cfg(test)]
#[path = "harness_driver_tests.rs"]
mod tests;
