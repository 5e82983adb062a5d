// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use skein_core::SequentialIdGen;
use skein_storage::InMemorySignalStore;

#[tokio::test]
async fn buffers_events_and_flushes_them_on_finish() {
    let store: Arc<dyn SignalStore> = Arc::new(InMemorySignalStore::new(Arc::new(
        SequentialIdGen::new("rec"),
    )));
    let recorder = Arc::new(
        Recorder::start(store.clone(), Some("demo".into()), vec![], 0)
            .await
            .unwrap(),
    );

    let bus = EventBus::new();
    recorder.install(&bus);

    bus.emit(Event::new("e1", "workflow:start", json!({})));
    bus.emit(Event::new("e2", "task:ready", json!({})));
    recorder.finish(42).await.unwrap();

    let recording = store.load(recorder.recording_id()).await.unwrap().unwrap();
    let names: Vec<_> = recording.events.iter().map(|e| e.name.clone()).collect();
    assert_eq!(names, vec!["workflow:start", "task:ready"]);
    assert_eq!(recording.meta.duration_ms, Some(42));
    assert!(recording.meta.is_finalized());
}

#[tokio::test]
async fn finish_with_no_events_still_finalizes() {
    let store: Arc<dyn SignalStore> = Arc::new(InMemorySignalStore::new(Arc::new(
        SequentialIdGen::new("rec"),
    )));
    let recorder = Recorder::start(store.clone(), None, vec![], 0)
        .await
        .unwrap();

    recorder.finish(5).await.unwrap();

    let recording = store.load(recorder.recording_id()).await.unwrap().unwrap();
    assert!(recording.events.is_empty());
    assert!(recording.meta.is_finalized());
}
