// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A `SignalStore` backed by a directory of append-only JSONL event logs,
//! one file per recording plus a sidecar metadata file.
//!
//! This is a deliberately simplified cousin of the teacher's write-ahead
//! log: recordings are appended to in full batches (no group-commit
//! buffering) and there is no corruption scan or `.bak` rotation on open,
//! because this store exists to persist finished recordings for replay,
//! not to resume a crashed run.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use skein_core::{Event, IdGen, Recording, RecordingMeta, RecordingQuery};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::store::{SignalStore, StoreError};

#[derive(serde::Serialize, serde::Deserialize)]
struct EventRecord {
    seq: u64,
    event: Event,
}

pub struct FileSignalStore {
    root: PathBuf,
    id_gen: Arc<dyn IdGen>,
    /// Per-recording append sequence counters, so concurrent writers to the
    /// same recording don't race on `seq` assignment.
    seqs: Mutex<HashMap<String, u64>>,
}

impl FileSignalStore {
    pub async fn open(root: impl AsRef<Path>, id_gen: Arc<dyn IdGen>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self {
            root,
            id_gen,
            seqs: Mutex::new(HashMap::new()),
        })
    }

    fn meta_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.meta.json"))
    }

    fn events_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.events.jsonl"))
    }

    async fn read_meta(&self, id: &str) -> Result<Option<RecordingMeta>, StoreError> {
        match fs::read(self.meta_path(id)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn write_meta(&self, meta: &RecordingMeta) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(meta)?;
        fs::write(self.meta_path(&meta.id), bytes).await?;
        Ok(())
    }

    async fn read_events(&self, id: &str) -> Result<Vec<Event>, StoreError> {
        let path = self.events_path(id);
        let contents = match fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut records: Vec<EventRecord> = contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(serde_json::from_str)
            .collect::<Result<_, _>>()?;
        records.sort_by_key(|record| record.seq);
        Ok(records.into_iter().map(|record| record.event).collect())
    }
}

#[async_trait]
impl SignalStore for FileSignalStore {
    async fn create(
        &self,
        name: Option<String>,
        tags: Vec<String>,
        created_at_ms: u64,
    ) -> Result<String, StoreError> {
        let id = self.id_gen.next();
        let meta = RecordingMeta::new(id.clone(), name, tags, created_at_ms);
        self.write_meta(&meta).await?;
        fs::write(self.events_path(&id), b"").await?;
        self.seqs.lock().insert(id.clone(), 0);
        Ok(id)
    }

    async fn append_batch(&self, id: &str, events: Vec<Event>) -> Result<(), StoreError> {
        let meta = self
            .read_meta(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if meta.is_finalized() {
            return Err(StoreError::AlreadyFinalized(id.to_string()));
        }
        if events.is_empty() {
            return Ok(());
        }

        let base = {
            let mut seqs = self.seqs.lock();
            let next = seqs.entry(id.to_string()).or_insert(0);
            let base = *next;
            *next += events.len() as u64;
            base
        };

        let mut buffer = String::new();
        for (offset, event) in events.into_iter().enumerate() {
            let record = EventRecord {
                seq: base + offset as u64,
                event,
            };
            buffer.push_str(&serde_json::to_string(&record)?);
            buffer.push('\n');
        }

        let mut file = fs::OpenOptions::new()
            .append(true)
            .open(self.events_path(id))
            .await?;
        file.write_all(buffer.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn finalize(&self, id: &str, duration_ms: u64) -> Result<(), StoreError> {
        let mut meta = self
            .read_meta(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if meta.is_finalized() {
            return Err(StoreError::AlreadyFinalized(id.to_string()));
        }
        meta.finalized_at_ms = Some(meta.created_at_ms + duration_ms);
        meta.duration_ms = Some(duration_ms);
        self.write_meta(&meta).await
    }

    async fn load(&self, id: &str) -> Result<Option<Recording>, StoreError> {
        let Some(meta) = self.read_meta(id).await? else {
            return Ok(None);
        };
        let events = self.read_events(id).await?;
        Ok(Some(Recording { meta, events }))
    }

    async fn list(&self, query: RecordingQuery) -> Result<Vec<RecordingMeta>, StoreError> {
        let mut out = Vec::new();
        let mut dir = fs::read_dir(&self.root).await?;
        while let Some(entry) = dir.next_entry().await? {
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            let Some(id) = file_name.strip_suffix(".meta.json") else {
                continue;
            };
            if let Some(meta) = self.read_meta(id).await? {
                if query.matches(&meta) {
                    out.push(meta);
                }
            }
        }
        Ok(out)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        for path in [self.meta_path(id), self.events_path(id)] {
            match fs::remove_file(&path).await {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        self.seqs.lock().remove(id);
        Ok(())
    }

    async fn exists(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.read_meta(id).await?.is_some())
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
