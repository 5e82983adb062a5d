// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recording metadata shared between the storage layer and the engine.

use crate::event::Event;
use serde::{Deserialize, Serialize};

/// Metadata describing one recorded run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingMeta {
    pub id: String,
    pub name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finalized_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl RecordingMeta {
    pub fn new(id: impl Into<String>, name: Option<String>, tags: Vec<String>, created_at_ms: u64) -> Self {
        Self {
            id: id.into(),
            name,
            tags,
            created_at_ms,
            finalized_at_ms: None,
            duration_ms: None,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized_at_ms.is_some()
    }
}

/// A finalised recording: its metadata plus the ordered event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub meta: RecordingMeta,
    pub events: Vec<Event>,
}

/// Filter for listing recordings.
#[derive(Debug, Clone, Default)]
pub struct RecordingQuery {
    pub name_prefix: Option<String>,
    pub tag: Option<String>,
}

impl RecordingQuery {
    pub fn matches(&self, meta: &RecordingMeta) -> bool {
        if let Some(prefix) = &self.name_prefix {
            if !meta.name.as_deref().unwrap_or_default().starts_with(prefix.as_str()) {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !meta.tags.iter().any(|t| t == tag) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
#[path = "recording_tests.rs"]
mod tests;
