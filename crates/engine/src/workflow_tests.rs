// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use skein_adapters::{FakeAdapter, FakeHarness, HarnessError, HarnessOutput, HarnessRequest};
use skein_core::{AgentDef, FakeClock, SequentialIdGen};
use skein_storage::InMemorySignalStore;
use std::time::Duration;
use tokio::sync::mpsc;

// S1: guard gating.

#[derive(Clone, Default, Serialize, Deserialize)]
struct GateState {
    enabled: bool,
}

#[tokio::test]
async fn a_failing_guard_skips_activation_but_lets_other_agents_run() {
    let factory = WorkflowFactory::new(UpdatePipeline::new())
        .agent(AgentDef::new("always", ["workflow:start"], "go"))
        .agent(AgentDef::new("gated", ["workflow:start"], "go").guard(|ctx| ctx.state.enabled));

    let harness = FakeHarness::new();
    harness.script_default(vec![], "ok", None);

    let config = RunConfig::new(
        GateState { enabled: false },
        FakeClock::new(),
        Arc::new(SequentialIdGen::new("id")) as Arc<dyn IdGen>,
    )
    .harness("mock", Arc::new(harness) as Arc<dyn Harness>)
    .default_harness("mock");

    let result = factory.run_reactive(config).await.unwrap();

    assert_eq!(result.metrics.activations, 1);
    assert!(result.signals.iter().any(|e| e.name == "agent:skipped"
        && e.payload["agent"] == "gated"
        && e.payload["reason"] == "guard false"));
    assert!(result
        .signals
        .iter()
        .any(|e| e.name == "agent:activated" && e.payload["agent"] == "always"));
}

// S2: a chain of activations, each caused by the previous one's emission.

#[derive(Clone, Default, Serialize, Deserialize)]
struct ChainState {}

#[tokio::test]
async fn activations_chain_through_emitted_events_with_a_causal_parent() {
    let factory = WorkflowFactory::new(UpdatePipeline::new())
        .agent(AgentDef::new("first", ["workflow:start"], "go").emits(["first:done"]))
        .agent(AgentDef::new("second", ["first:done"], "go").emits(["second:done"]))
        .agent(AgentDef::new("third", ["second:done"], "go"));

    let harness = FakeHarness::new();
    harness.script_default(vec![], "ok", None);

    let config = RunConfig::new(
        ChainState {},
        FakeClock::new(),
        Arc::new(SequentialIdGen::new("id")) as Arc<dyn IdGen>,
    )
    .harness("mock", Arc::new(harness) as Arc<dyn Harness>)
    .default_harness("mock");

    let result = factory.run_reactive(config).await.unwrap();

    assert_eq!(result.metrics.activations, 3);

    let activated_id = |agent: &str| -> String {
        result
            .signals
            .iter()
            .find(|e| e.name == "agent:activated" && e.payload["agent"] == agent)
            .unwrap()
            .id
            .clone()
    };
    let emitted_parent = |name: &str| -> Option<String> {
        result
            .signals
            .iter()
            .find(|e| e.name == name)
            .and_then(|e| e.parent_id().map(str::to_string))
    };

    assert_eq!(emitted_parent("first:done"), Some(activated_id("first")));
    assert_eq!(emitted_parent("second:done"), Some(activated_id("second")));
}

// S3: a reducer and a process manager cooperating on the same event.

#[derive(Clone, Default, Serialize, Deserialize)]
struct PlanState {
    tasks: Vec<serde_json::Value>,
}

#[tokio::test]
async fn a_reducer_and_a_process_manager_both_act_on_the_same_event() {
    let pipeline = UpdatePipeline::new()
        .reducer(
            ["plan:created"],
            Arc::new(|e: &Event, s: &mut PlanState| {
                if let Some(tasks) = e.payload.get("tasks").and_then(|v| v.as_array()) {
                    s.tasks = tasks.clone();
                }
            }),
        )
        .process(
            ["plan:created"],
            Arc::new(|_e: &Event, s: &PlanState| {
                let task_id = s
                    .tasks
                    .first()
                    .and_then(|t| t.get("id"))
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string();
                vec![Event::new("derived", "task:ready", json!({ "taskId": task_id }))]
            }),
        );

    let factory = WorkflowFactory::new(pipeline).agent(
        AgentDef::new("planner", ["workflow:start"], "go")
            .schema(json!({"type": "object"}))
            .emits(["plan:created"]),
    );

    let harness = FakeHarness::new();
    harness.script_for("planner", vec![], "ok", Some(json!({"tasks": [{"id": "T1"}]})));

    let config = RunConfig::new(
        PlanState::default(),
        FakeClock::new(),
        Arc::new(SequentialIdGen::new("id")) as Arc<dyn IdGen>,
    )
    .harness("mock", Arc::new(harness) as Arc<dyn Harness>)
    .default_harness("mock");

    let result = factory.run_reactive(config).await.unwrap();

    assert_eq!(result.state.tasks, vec![json!({"id": "T1"})]);

    let plan_created_idx = result
        .signals
        .iter()
        .position(|e| e.name == "plan:created")
        .unwrap();
    let task_ready_idx = result
        .signals
        .iter()
        .position(|e| e.name == "task:ready")
        .unwrap();
    assert!(task_ready_idx > plan_created_idx);
    assert_eq!(
        result.signals[task_ready_idx].payload["taskId"],
        json!("T1")
    );
}

// S4: endWhen terminates the run and stops new activations.

#[derive(Clone, Default, Serialize, Deserialize)]
struct DoneState {
    done: bool,
}

#[tokio::test]
async fn end_when_terminates_the_run_once_its_predicate_is_satisfied() {
    let factory = WorkflowFactory::new(UpdatePipeline::new())
        .agent(
            AgentDef::new("writer", ["workflow:start"], "go")
                .schema(json!({"type": "object"}))
                .updates("done"),
        )
        .agent(AgentDef::new("watcher", ["state:done:changed"], "go"));

    let harness = FakeHarness::new();
    harness.script_for("writer", vec![], "ok", Some(json!(true)));
    harness.script_default(vec![], "ok", None);

    let config = RunConfig::new(
        DoneState::default(),
        FakeClock::new(),
        Arc::new(SequentialIdGen::new("id")) as Arc<dyn IdGen>,
    )
    .harness("mock", Arc::new(harness) as Arc<dyn Harness>)
    .default_harness("mock")
    .end_when(|s: &DoneState| s.done);

    let result = factory.run_reactive(config).await.unwrap();

    assert!(result.terminated_early);
    assert!(result.state.done);
    assert!(result
        .signals
        .iter()
        .any(|e| e.name == "workflow:terminating"
            && e.payload["reason"] == "endWhen"
            && e.payload["agent"] == "writer"));
}

// S5: a run that exceeds its timeout is rejected, and adapters still tear
// down cleanly.

struct SleepyHarness {
    delay_ms: u64,
}

#[async_trait]
impl Harness for SleepyHarness {
    async fn run(
        &self,
        _request: HarnessRequest,
        _event_tx: mpsc::Sender<Event>,
    ) -> Result<HarnessOutput, HarnessError> {
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        Ok(HarnessOutput {
            output: "too late".into(),
            structured_output: None,
        })
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
struct TimeoutState {}

#[tokio::test]
async fn a_slow_activation_times_out_and_still_tears_down_adapters() {
    let factory = WorkflowFactory::new(UpdatePipeline::new())
        .agent(AgentDef::new("slow", ["workflow:start"], "go"));

    let adapter = Arc::new(FakeAdapter::new("log", ["**"]));

    let config = RunConfig::new(
        TimeoutState {},
        FakeClock::new(),
        Arc::new(SequentialIdGen::new("id")) as Arc<dyn IdGen>,
    )
    .harness("mock", Arc::new(SleepyHarness { delay_ms: 200 }) as Arc<dyn Harness>)
    .default_harness("mock")
    .adapter(adapter.clone())
    .timeout_ms(30);

    let result = factory.run_reactive(config).await;

    assert!(matches!(result, Err(RunError::Timeout { .. })));
    assert!(adapter.calls().contains(&skein_adapters::AdapterCall::Stop));
}

// S6: record then replay reproduces the same harness-family signals and the
// same final state, without driving a harness at all during replay.

#[derive(Clone, Default, Serialize, Deserialize)]
struct RecordState {
    last: Option<String>,
}

#[tokio::test]
async fn replaying_a_recording_reproduces_its_harness_signals_and_final_state() {
    let harness = FakeHarness::new();
    harness.script_for(
        "writer",
        vec![
            Event::new("h1", "harness:start", json!({})),
            Event::new("h2", "text:delta", json!({"text": "hi"})),
            Event::new(
                "h3",
                "harness:end",
                json!({"output": "hello", "structuredOutput": "hello"}),
            ),
        ],
        "hello",
        Some(json!("hello")),
    );

    let record_store: Arc<dyn SignalStore> =
        Arc::new(InMemorySignalStore::new(Arc::new(SequentialIdGen::new("rec"))));

    let recorded = WorkflowFactory::new(UpdatePipeline::new())
        .agent(
            AgentDef::new("writer", ["workflow:start"], "go")
                .schema(json!({"type": "object"}))
                .updates("last"),
        )
        .run_reactive(
            RunConfig::new(
                RecordState::default(),
                FakeClock::new(),
                Arc::new(SequentialIdGen::new("id")) as Arc<dyn IdGen>,
            )
            .harness("mock", Arc::new(harness) as Arc<dyn Harness>)
            .default_harness("mock")
            .mode(RunMode::Record {
                store: record_store.clone(),
                name: Some("demo".into()),
                tags: vec![],
            }),
        )
        .await
        .unwrap();

    let recording_id = recorded.recording_id.clone().unwrap();

    let replayed = WorkflowFactory::new(UpdatePipeline::new())
        .agent(
            AgentDef::new("writer", ["workflow:start"], "go")
                .schema(json!({"type": "object"}))
                .updates("last"),
        )
        .run_reactive(
            RunConfig::new(
                RecordState::default(),
                FakeClock::new(),
                Arc::new(SequentialIdGen::new("id")) as Arc<dyn IdGen>,
            )
            .mode(RunMode::Replay {
                store: record_store,
                recording_id,
            }),
        )
        .await
        .unwrap();

    let harness_family = |signals: &[Event]| -> Vec<(String, serde_json::Value)> {
        signals
            .iter()
            .filter(|e| e.is_harness_family())
            .map(|e| (e.name.clone(), e.payload.clone()))
            .collect()
    };

    assert_eq!(harness_family(&recorded.signals), harness_family(&replayed.signals));
    assert_eq!(recorded.state.last, replayed.state.last);
    assert_eq!(replayed.state.last, Some("hello".to_string()));
}

// General testable properties: event ids are unique and every non-root
// event's parent points at an id that actually exists in the history.

#[tokio::test]
async fn every_event_id_is_unique_and_every_parent_resolves_to_a_real_event() {
    let factory = WorkflowFactory::new(UpdatePipeline::new())
        .agent(AgentDef::new("first", ["workflow:start"], "go").emits(["first:done"]))
        .agent(AgentDef::new("second", ["first:done"], "go"));

    let harness = FakeHarness::new();
    harness.script_default(vec![], "ok", None);

    let config = RunConfig::new(
        ChainState {},
        FakeClock::new(),
        Arc::new(SequentialIdGen::new("id")) as Arc<dyn IdGen>,
    )
    .harness("mock", Arc::new(harness) as Arc<dyn Harness>)
    .default_harness("mock");

    let result = factory.run_reactive(config).await.unwrap();

    let mut ids: Vec<&str> = result.signals.iter().map(|e| e.id.as_str()).collect();
    ids.sort_unstable();
    let unique_count = {
        let mut v = ids.clone();
        v.dedup();
        v.len()
    };
    assert_eq!(unique_count, ids.len());

    for event in &result.signals {
        if let Some(parent) = event.parent_id() {
            assert!(result.signals.iter().any(|e| e.id == parent));
        }
    }

    assert_eq!(
        result
            .signals
            .iter()
            .filter(|e| e.name == "agent:activated")
            .count() as u64,
        result.metrics.activations
    );
}
