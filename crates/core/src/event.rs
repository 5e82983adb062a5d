// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The immutable event record that flows on the bus.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Causal metadata for an event: who produced it and what caused it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSource {
    /// Agent name that produced this event, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    /// Harness name that produced this event, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub harness: Option<String>,
    /// ID of the event whose delivery produced this one. Root events
    /// (e.g. `workflow:start`) have no parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl EventSource {
    pub fn agent(name: impl Into<String>) -> Self {
        Self {
            agent: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// An immutable event on the bus.
///
/// Once constructed, no field is mutated — `name`, `payload`, and `source`
/// are set at construction and never written to again. `id` is assigned by
/// the caller's `IdGen` and is unique and lexicographically increasing
/// within a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    /// Colon-delimited name, e.g. `task:ready`.
    pub name: String,
    pub payload: Value,
    /// UTC millisecond timestamp.
    pub timestamp_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<EventSource>,
}

impl Event {
    pub fn new(id: impl Into<String>, name: impl Into<String>, payload: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            payload,
            timestamp_ms: 0,
            source: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    pub fn with_source(mut self, source: EventSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| s.parent.as_deref())
    }

    /// True if this event's name is in the `harness:*`, `text:*`,
    /// `thinking:*`, or `tool:*` families — the families a harness yields.
    pub fn is_harness_family(&self) -> bool {
        const PREFIXES: &[&str] = &["harness:", "text:", "thinking:", "tool:"];
        PREFIXES.iter().any(|p| self.name.starts_with(p))
    }

    pub fn is_harness_end(&self) -> bool {
        self.name == "harness:end"
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
