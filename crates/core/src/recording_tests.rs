// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_recording_is_not_finalized() {
    let meta = RecordingMeta::new("rec-1", Some("demo".into()), vec!["smoke".into()], 1000);
    assert!(!meta.is_finalized());
}

#[test]
fn finalized_recording_reports_duration() {
    let mut meta = RecordingMeta::new("rec-1", None, vec![], 1000);
    meta.finalized_at_ms = Some(1500);
    meta.duration_ms = Some(500);
    assert!(meta.is_finalized());
    assert_eq!(meta.duration_ms, Some(500));
}

#[test]
fn query_filters_by_name_prefix() {
    let meta = RecordingMeta::new("rec-1", Some("nightly-smoke".into()), vec![], 0);
    let query = RecordingQuery {
        name_prefix: Some("nightly".into()),
        tag: None,
    };
    assert!(query.matches(&meta));

    let query = RecordingQuery {
        name_prefix: Some("release".into()),
        tag: None,
    };
    assert!(!query.matches(&meta));
}

#[test]
fn query_filters_by_tag() {
    let meta = RecordingMeta::new("rec-1", None, vec!["ci".into(), "smoke".into()], 0);
    let query = RecordingQuery {
        name_prefix: None,
        tag: Some("smoke".into()),
    };
    assert!(query.matches(&meta));

    let query = RecordingQuery {
        name_prefix: None,
        tag: Some("nightly".into()),
    };
    assert!(!query.matches(&meta));
}

#[test]
fn empty_query_matches_everything() {
    let meta = RecordingMeta::new("rec-1", None, vec![], 0);
    assert!(RecordingQuery::default().matches(&meta));
}
