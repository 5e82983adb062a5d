// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Best-effort JSON extraction from harness text output.
//!
//! When a harness advertised a schema but returned only prose, the engine
//! makes one attempt at recovering structured output: find the first `{` or
//! `[`, pair it with the last matching `}` or `]`, and try to parse the
//! slice between them. This is an interoperability hack for imperfect
//! backends, not a semantic guarantee — failure is silent.

use serde_json::Value;

/// Attempt to locate and parse a JSON object or array embedded in `text`.
/// Returns `None` if no `{`/`[` is found or the extracted slice doesn't
/// parse.
pub fn extract_json(text: &str) -> Option<Value> {
    let open_brace = text.find('{');
    let open_bracket = text.find('[');

    let (open_idx, close_char) = match (open_brace, open_bracket) {
        (Some(b), Some(k)) if b <= k => (b, '}'),
        (Some(b), None) => (b, '}'),
        (_, Some(k)) => (k, ']'),
        (None, None) => return None,
    };

    let close_idx = text.rfind(close_char)?;
    if close_idx <= open_idx {
        return None;
    }

    serde_json::from_str(&text[open_idx..=close_idx]).ok()
}

#[cfg(test)]
#[path = "json_fallback_tests.rs"]
mod tests;
