// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn timeout_error_mentions_the_configured_timeout() {
    let err = RunError::Timeout { timeout_ms: 2500 };
    assert!(err.to_string().contains("2500"));
}

#[test]
fn aborted_error_mentions_reason() {
    let err = RunError::Aborted {
        reason: "operator cancelled".into(),
    };
    assert!(err.to_string().contains("operator cancelled"));
}

#[test]
fn harness_error_converts_via_from() {
    let err: RunError = HarnessError::SpawnFailed("boom".into()).into();
    assert!(matches!(err, RunError::Harness(_)));
}

#[test]
fn storage_error_converts_via_from() {
    let err: RunError = StoreError::NotFound("rec-1".into()).into();
    assert!(matches!(err, RunError::Storage(_)));
}

#[test]
fn replay_exhausted_error_mentions_the_agent() {
    let err = RunError::ReplayExhausted {
        agent: "writer".into(),
    };
    assert!(err.to_string().contains("writer"));
}
