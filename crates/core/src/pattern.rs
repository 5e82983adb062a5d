// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Glob pattern matching over colon-segmented event names.
//!
//! A pattern is a colon-separated sequence of segments, each of which is a
//! literal, `*` (matches exactly one segment), or `**` (matches any number
//! of remaining segments, including zero — only meaningful as the final
//! segment). Matching is anchored: the pattern must consume the entire name.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
enum Segment {
    Literal(String),
    Star,
    DoubleStar,
}

/// A compiled pattern, ready to be tested against event names repeatedly
/// without re-parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern {
    #[serde(skip)]
    segments: Vec<Segment>,
    source: String,
}

impl Pattern {
    /// Compile a pattern string. Never fails: any colon-separated string is
    /// a valid pattern, with `**` only meaningful as the last segment (a
    /// `**` appearing earlier is still accepted, but behaves like `*`
    /// there since the matcher only grants multi-segment semantics to a
    /// trailing `**`).
    pub fn compile(source: impl Into<String>) -> Self {
        let source = source.into();
        let parts: Vec<&str> = source.split(':').collect();
        let last_index = parts.len().saturating_sub(1);
        let segments = parts
            .iter()
            .enumerate()
            .map(|(i, part)| match *part {
                "**" if i == last_index => Segment::DoubleStar,
                "*" => Segment::Star,
                "**" => Segment::Star,
                lit => Segment::Literal(lit.to_string()),
            })
            .collect();
        Self { segments, source }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True if `name`'s segments are fully consumed by this pattern.
    pub fn matches(&self, name: &str) -> bool {
        let name_segments: Vec<&str> = name.split(':').collect();
        matches_segments(&self.segments, &name_segments)
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

fn matches_segments(pattern: &[Segment], name: &[&str]) -> bool {
    match pattern.first() {
        None => name.is_empty(),
        Some(Segment::DoubleStar) => true,
        Some(Segment::Star) => {
            !name.is_empty() && matches_segments(&pattern[1..], &name[1..])
        }
        Some(Segment::Literal(lit)) => {
            !name.is_empty() && name[0] == lit && matches_segments(&pattern[1..], &name[1..])
        }
    }
}

/// Compile-once, test-many matcher for a fixed set of patterns, as used by
/// a single subscription or agent definition.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    pub fn compile<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Pattern::compile).collect(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(name))
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }
}

/// Standalone convenience matching a single pattern string against a name,
/// without keeping the compiled form around. Prefer `Pattern::compile` when
/// the same pattern is tested repeatedly.
pub fn matches(pattern: &str, name: &str) -> bool {
    Pattern::compile(pattern).matches(name)
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
