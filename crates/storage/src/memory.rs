// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An in-process `SignalStore` backed by a `HashMap`. The default store for
//! tests and for runs that don't need recordings to survive the process.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use skein_core::{Event, IdGen, Recording, RecordingMeta, RecordingQuery};

use crate::store::{SignalStore, StoreError};

struct Entry {
    meta: RecordingMeta,
    events: Vec<Event>,
}

pub struct InMemorySignalStore {
    id_gen: Arc<dyn IdGen>,
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemorySignalStore {
    pub fn new(id_gen: Arc<dyn IdGen>) -> Self {
        Self {
            id_gen,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SignalStore for InMemorySignalStore {
    async fn create(
        &self,
        name: Option<String>,
        tags: Vec<String>,
        created_at_ms: u64,
    ) -> Result<String, StoreError> {
        let id = self.id_gen.next();
        let meta = RecordingMeta::new(id.clone(), name, tags, created_at_ms);
        self.entries.lock().insert(
            id.clone(),
            Entry {
                meta,
                events: Vec::new(),
            },
        );
        Ok(id)
    }

    async fn append_batch(&self, id: &str, events: Vec<Event>) -> Result<(), StoreError> {
        let mut entries = self.entries.lock();
        let entry = entries
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if entry.meta.is_finalized() {
            return Err(StoreError::AlreadyFinalized(id.to_string()));
        }
        entry.events.extend(events);
        Ok(())
    }

    async fn finalize(&self, id: &str, duration_ms: u64) -> Result<(), StoreError> {
        let mut entries = self.entries.lock();
        let entry = entries
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if entry.meta.is_finalized() {
            return Err(StoreError::AlreadyFinalized(id.to_string()));
        }
        let finished_at = entry.meta.created_at_ms + duration_ms;
        entry.meta.finalized_at_ms = Some(finished_at);
        entry.meta.duration_ms = Some(duration_ms);
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Option<Recording>, StoreError> {
        let entries = self.entries.lock();
        Ok(entries.get(id).map(|entry| Recording {
            meta: entry.meta.clone(),
            events: entry.events.clone(),
        }))
    }

    async fn list(&self, query: RecordingQuery) -> Result<Vec<RecordingMeta>, StoreError> {
        let entries = self.entries.lock();
        Ok(entries
            .values()
            .map(|entry| &entry.meta)
            .filter(|meta| query.matches(meta))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.entries.lock().remove(id);
        Ok(())
    }

    async fn exists(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.entries.lock().contains_key(id))
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
