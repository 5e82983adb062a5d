// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The workflow factory: binds a state type to a set of agents and an
//! update pipeline, then runs a reactive workflow to quiescence (or
//! timeout), wiring the bus, state box, scheduler, recorder/replayer, and
//! adapters together per run.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use skein_adapters::{Adapter, Harness};
use skein_core::{AgentContext, AgentDef, Clock, Event, EventSource, IdGen};
use skein_storage::SignalStore;

use crate::adapter_runtime::AdapterRuntime;
use crate::bus::EventBus;
use crate::error::RunError;
use crate::harness_driver;
use crate::pipeline::UpdatePipeline;
use crate::recorder::Recorder;
use crate::replayer::Replayer;
use crate::scheduler::ActivationScheduler;
use crate::state_box::StateBox;

/// How a run persists or replays its signal history.
pub enum RunMode {
    Live,
    Record {
        store: Arc<dyn SignalStore>,
        name: Option<String>,
        tags: Vec<String>,
    },
    Replay {
        store: Arc<dyn SignalStore>,
        recording_id: String,
    },
}

/// Per-run configuration: the initial state, external collaborators, and
/// how this particular invocation should persist or replay its history.
/// Reusable across runs; `agents`/`pipeline` live on `WorkflowFactory`
/// instead, since those describe the workflow itself, not one run of it.
pub struct RunConfig<S, C: Clock> {
    pub state: S,
    pub clock: C,
    pub id_gen: Arc<dyn IdGen>,
    pub adapters: Vec<Arc<dyn Adapter>>,
    pub harnesses: HashMap<String, Arc<dyn Harness>>,
    pub default_harness: Option<String>,
    pub input: Option<String>,
    pub timeout_ms: Option<u64>,
    pub end_when: Option<Arc<dyn Fn(&S) -> bool + Send + Sync>>,
    pub mode: RunMode,
}

impl<S, C: Clock> RunConfig<S, C> {
    pub fn new(state: S, clock: C, id_gen: Arc<dyn IdGen>) -> Self {
        Self {
            state,
            clock,
            id_gen,
            adapters: Vec::new(),
            harnesses: HashMap::new(),
            default_harness: None,
            input: None,
            timeout_ms: None,
            end_when: None,
            mode: RunMode::Live,
        }
    }

    pub fn adapter(mut self, adapter: Arc<dyn Adapter>) -> Self {
        self.adapters.push(adapter);
        self
    }

    pub fn harness(mut self, name: impl Into<String>, harness: Arc<dyn Harness>) -> Self {
        self.harnesses.insert(name.into(), harness);
        self
    }

    pub fn default_harness(mut self, name: impl Into<String>) -> Self {
        self.default_harness = Some(name.into());
        self
    }

    pub fn input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn end_when(mut self, predicate: impl Fn(&S) -> bool + Send + Sync + 'static) -> Self {
        self.end_when = Some(Arc::new(predicate));
        self
    }

    pub fn mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunMetrics {
    pub duration_ms: u64,
    pub activations: u64,
    pub per_agent_ms: HashMap<String, u64>,
}

pub struct RunResult<S> {
    pub state: Arc<S>,
    pub signals: Vec<Event>,
    pub metrics: RunMetrics,
    pub terminated_early: bool,
    pub recording_id: Option<String>,
}

/// Binds a state type to a set of agents and an update pipeline.
pub struct WorkflowFactory<S> {
    agents: Vec<AgentDef<S>>,
    pipeline: UpdatePipeline<S>,
}

impl<S> WorkflowFactory<S>
where
    S: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(pipeline: UpdatePipeline<S>) -> Self {
        Self {
            agents: Vec::new(),
            pipeline,
        }
    }

    pub fn agent(mut self, def: AgentDef<S>) -> Self {
        self.agents.push(def);
        self
    }

    /// Executes one run of this workflow to quiescence or timeout.
    pub async fn run_reactive<C: Clock + 'static>(
        self,
        config: RunConfig<S, C>,
    ) -> Result<RunResult<S>, RunError> {
        let replayer = match &config.mode {
            RunMode::Replay { store, recording_id } => {
                let recording = store
                    .load(recording_id)
                    .await?
                    .ok_or_else(|| RunError::RecordingNotFound(recording_id.clone()))?;
                Some(Arc::new(Replayer::new(recording)))
            }
            _ => None,
        };

        let bus = Arc::new(EventBus::new());

        let recorder = match &config.mode {
            RunMode::Record { store, name, tags } => {
                let recorder = Arc::new(
                    Recorder::start(
                        store.clone(),
                        name.clone(),
                        tags.clone(),
                        config.clock.epoch_ms(),
                    )
                    .await?,
                );
                recorder.install(&bus);
                Some(recorder)
            }
            _ => None,
        };

        let adapter_runtime = AdapterRuntime::new(config.adapters);
        let subscription_ids = adapter_runtime.start(&bus).await;

        let run_start_ms = config.clock.epoch_ms();
        let state = Arc::new(StateBox::new(config.state));

        let pipeline = Arc::new(self.pipeline);
        pipeline.install(&bus, state.clone());

        let scheduler = Arc::new(ActivationScheduler::new());
        let run_ctx = RunContext {
            bus: bus.clone(),
            state: state.clone(),
            scheduler: scheduler.clone(),
            id_gen: config.id_gen.clone(),
            clock: config.clock.clone(),
            harnesses: Arc::new(config.harnesses),
            default_harness: config.default_harness.clone(),
            replayer,
            end_when: config.end_when.clone(),
            input: config.input.clone(),
            per_agent_ms: Arc::new(Mutex::new(HashMap::new())),
        };

        let agent_names: Vec<String> = self.agents.iter().map(|a| a.name.clone()).collect();
        for agent in self.agents {
            install_agent(Arc::new(agent), run_ctx.clone());
        }

        bus.emit(
            Event::new(
                config.id_gen.next(),
                "workflow:start",
                json!({
                    "agents": agent_names,
                    "state": serde_json::to_value(&*state.get()).unwrap_or(Value::Null),
                }),
            )
            .with_timestamp(config.clock.epoch_ms()),
        );

        let configured_timeout_ms = config.timeout_ms.filter(|&ms| ms > 0);
        let drain_outcome = match configured_timeout_ms {
            Some(ms) => {
                tokio::time::timeout(Duration::from_millis(ms), scheduler.drain_until_quiescent())
                    .await
            }
            None => {
                scheduler.drain_until_quiescent().await;
                Ok(())
            }
        };

        let duration_ms = config.clock.epoch_ms().saturating_sub(run_start_ms);
        let activations = scheduler.activation_count();
        let terminated_early = scheduler.is_terminated();

        let run_outcome = match drain_outcome {
            Ok(()) => {
                bus.emit(
                    Event::new(
                        config.id_gen.next(),
                        "workflow:end",
                        json!({
                            "durationMs": duration_ms,
                            "activations": activations,
                            "state": serde_json::to_value(&*state.get()).unwrap_or(Value::Null),
                        }),
                    )
                    .with_timestamp(config.clock.epoch_ms()),
                );
                Ok(())
            }
            Err(_) => Err(RunError::Timeout {
                timeout_ms: configured_timeout_ms.unwrap_or(duration_ms),
            }),
        };

        if let Some(recorder) = &recorder {
            if let Err(err) = recorder.finish(duration_ms).await {
                tracing::error!(error = %err, "failed to finalize recording");
            }
        }
        let recording_id = recorder.as_ref().map(|r| r.recording_id().to_string());
        adapter_runtime.stop(&bus, &subscription_ids).await;

        run_outcome?;

        Ok(RunResult {
            state: state.get(),
            signals: bus.history(),
            metrics: RunMetrics {
                duration_ms,
                activations,
                per_agent_ms: run_ctx.per_agent_ms.lock().clone(),
            },
            terminated_early,
            recording_id,
        })
    }
}

struct RunContext<S, C: Clock> {
    bus: Arc<EventBus>,
    state: Arc<StateBox<S>>,
    scheduler: Arc<ActivationScheduler>,
    id_gen: Arc<dyn IdGen>,
    clock: C,
    harnesses: Arc<HashMap<String, Arc<dyn Harness>>>,
    default_harness: Option<String>,
    replayer: Option<Arc<Replayer>>,
    end_when: Option<Arc<dyn Fn(&S) -> bool + Send + Sync>>,
    input: Option<String>,
    per_agent_ms: Arc<Mutex<HashMap<String, u64>>>,
}

impl<S, C: Clock> Clone for RunContext<S, C> {
    fn clone(&self) -> Self {
        Self {
            bus: self.bus.clone(),
            state: self.state.clone(),
            scheduler: self.scheduler.clone(),
            id_gen: self.id_gen.clone(),
            clock: self.clock.clone(),
            harnesses: self.harnesses.clone(),
            default_harness: self.default_harness.clone(),
            replayer: self.replayer.clone(),
            end_when: self.end_when.clone(),
            input: self.input.clone(),
            per_agent_ms: self.per_agent_ms.clone(),
        }
    }
}

/// Subscribes `agent` to the bus under its `activate_on` patterns,
/// implementing the per-event activation steps: skip if terminated, build
/// context, check the guard, emit `agent:activated`, then spawn the
/// activation (live harness or replay) tracked by the scheduler.
fn install_agent<S, C>(agent: Arc<AgentDef<S>>, ctx: RunContext<S, C>)
where
    S: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
    C: Clock + 'static,
{
    let patterns: Vec<String> = agent
        .activate_on
        .patterns()
        .iter()
        .map(|p| p.as_str().to_string())
        .collect();
    let bus = ctx.bus.clone();

    bus.subscribe(
        patterns,
        Arc::new(move |event: &Event| {
            if ctx.scheduler.should_skip_activation() {
                ctx.bus.emit(Event::new(
                    ctx.id_gen.next(),
                    "agent:skipped",
                    json!({ "agent": agent.name, "reason": "workflow terminated", "trigger": event.name }),
                ).with_timestamp(ctx.clock.epoch_ms()));
                return;
            }

            let snapshot = ctx.state.get();
            let guard_ctx = AgentContext {
                event,
                state: &snapshot,
                input: ctx.input.as_deref(),
            };
            if !agent.passes_guard(&guard_ctx) {
                ctx.bus.emit(Event::new(
                    ctx.id_gen.next(),
                    "agent:skipped",
                    json!({ "agent": agent.name, "reason": "guard false", "trigger": event.name }),
                ).with_timestamp(ctx.clock.epoch_ms()));
                return;
            }

            let activated_id = ctx.id_gen.next();
            ctx.bus.emit(
                Event::new(
                    activated_id.clone(),
                    "agent:activated",
                    json!({ "agent": agent.name, "trigger": event.name }),
                )
                .with_timestamp(ctx.clock.epoch_ms())
                .with_source(EventSource::agent(agent.name.clone()).with_parent(event.id.clone())),
            );

            let agent = agent.clone();
            let ctx = ctx.clone();
            let event = event.clone();
            ctx.scheduler.clone().spawn(async move {
                run_activation(agent, ctx, event, activated_id).await;
            });
        }),
    );
}

async fn run_activation<S, C>(
    agent: Arc<AgentDef<S>>,
    ctx: RunContext<S, C>,
    event: Event,
    activated_id: String,
) where
    S: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
    C: Clock + 'static,
{
    let started_at = ctx.clock.now();
    let snapshot = ctx.state.get();
    let activation_ctx = AgentContext {
        event: &event,
        state: &snapshot,
        input: ctx.input.as_deref(),
    };

    let outcome = if let Some(replayer) = &ctx.replayer {
        replayer.replay_next(&agent.name, agent.schema.is_some(), &ctx.bus)
    } else {
        let harness = agent
            .harness
            .as_ref()
            .and_then(|name| ctx.harnesses.get(name))
            .or_else(|| {
                ctx.default_harness
                    .as_ref()
                    .and_then(|name| ctx.harnesses.get(name))
            });
        match harness {
            Some(harness) => {
                harness_driver::drive(&agent, &activation_ctx, harness.as_ref(), &ctx.bus).await
            }
            None => {
                tracing::error!(agent = %agent.name, "no harness configured for this activation");
                return;
            }
        }
    };

    let elapsed_ms = ctx.clock.now().saturating_duration_since(started_at).as_millis() as u64;
    *ctx.per_agent_ms.lock().entry(agent.name.clone()).or_insert(0) += elapsed_ms;

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!(agent = %agent.name, error = %err, "activation failed");
            return;
        }
    };

    let emitted_value = outcome
        .structured_output
        .clone()
        .unwrap_or_else(|| json!({ "agent": agent.name, "output": outcome.output }));

    if let Some(field) = &agent.updates {
        let (old_value, new_value) = apply_agent_update(&ctx.state, field, emitted_value.clone());
        ctx.bus.emit(
            Event::new(
                ctx.id_gen.next(),
                format!("state:{field}:changed"),
                json!({ "key": field, "oldValue": old_value, "newValue": new_value, "agent": agent.name }),
            )
            .with_timestamp(ctx.clock.epoch_ms())
            .with_source(EventSource::agent(agent.name.clone()).with_parent(activated_id.clone())),
        );
    }

    if let Some(end_when) = &ctx.end_when {
        let latest = ctx.state.get();
        if end_when(&latest) && ctx.scheduler.mark_terminated("endWhen", &agent.name) {
            ctx.bus.emit(
                Event::new(
                    ctx.id_gen.next(),
                    "workflow:terminating",
                    json!({
                        "reason": "endWhen",
                        "agent": agent.name,
                        "state": serde_json::to_value(&*latest).unwrap_or(Value::Null),
                    }),
                )
                .with_timestamp(ctx.clock.epoch_ms()),
            );
        }
    }

    for name in &agent.emits {
        ctx.bus.emit(
            Event::new(ctx.id_gen.next(), name.clone(), emitted_value.clone())
                .with_timestamp(ctx.clock.epoch_ms())
                .with_source(
                    EventSource::agent(agent.name.clone()).with_parent(activated_id.clone()),
                ),
        );
    }
}

/// Overwrites a named field of `S` with `value` by round-tripping through
/// `serde_json`, matching the engine's JSON-fallback philosophy for the one
/// place a passive agent description needs to mutate an otherwise-opaque
/// state type by field name. Silently leaves state unchanged if `S` doesn't
/// serialize to a JSON object or the field's new value doesn't deserialize
/// back into `S`.
fn apply_agent_update<S>(state: &StateBox<S>, field: &str, value: Value) -> (Value, Value)
where
    S: Clone + Serialize + DeserializeOwned,
{
    let mut old_value = Value::Null;
    let committed = state.update(|s| {
        let Ok(mut as_value) = serde_json::to_value(&*s) else {
            return;
        };
        let Some(obj) = as_value.as_object_mut() else {
            return;
        };
        old_value = obj.get(field).cloned().unwrap_or(Value::Null);
        obj.insert(field.to_string(), value.clone());
        if let Ok(updated) = serde_json::from_value(as_value) {
            *s = updated;
        }
    });
    let new_value = serde_json::to_value(&*committed)
        .ok()
        .and_then(|v| v.get(field).cloned())
        .unwrap_or(Value::Null);
    (old_value, new_value)
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
