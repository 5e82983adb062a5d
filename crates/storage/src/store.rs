// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `SignalStore` contract: append-only recording persistence consumed
//! by the recorder/replayer (`skein-engine::recorder`/`replayer`).

use async_trait::async_trait;
use skein_core::{Event, Recording, RecordingMeta, RecordingQuery};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("recording not found: {0}")]
    NotFound(String),

    #[error("recording already finalized: {0}")]
    AlreadyFinalized(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persists recorded runs. Recordings are append-only until `finalize`;
/// implementations must preserve event order exactly as appended.
#[async_trait]
pub trait SignalStore: Send + Sync {
    /// Creates a new, empty recording and returns its assigned id.
    async fn create(
        &self,
        name: Option<String>,
        tags: Vec<String>,
        created_at_ms: u64,
    ) -> Result<String, StoreError>;

    /// Appends a batch of events to a not-yet-finalized recording, in order.
    async fn append_batch(&self, id: &str, events: Vec<Event>) -> Result<(), StoreError>;

    /// Marks a recording complete. No further appends are accepted.
    async fn finalize(&self, id: &str, duration_ms: u64) -> Result<(), StoreError>;

    /// Loads a recording's metadata and full event log, if it exists.
    async fn load(&self, id: &str) -> Result<Option<Recording>, StoreError>;

    /// Lists metadata for recordings matching `query`.
    async fn list(&self, query: RecordingQuery) -> Result<Vec<RecordingMeta>, StoreError>;

    /// Deletes a recording. A no-op if it does not exist.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Reports whether a recording with this id exists.
    async fn exists(&self, id: &str) -> Result<bool, StoreError>;
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
