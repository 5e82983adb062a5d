// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent definitions: passive descriptions of `{patterns, guard, emits,
//! updates, prompt, harness, schema}`. An agent is a record, not a class —
//! all activation happens through the bus (see `skein-engine::scheduler`).

use crate::event::Event;
use crate::pattern::PatternSet;
use serde_json::Value;
use std::sync::Arc;

/// Context passed to an agent's guard and dynamic prompt function.
pub struct AgentContext<'a, S> {
    pub event: &'a Event,
    pub state: &'a S,
    pub input: Option<&'a str>,
}

/// A guard predicate: `ctx -> bool`.
pub type Guard<S> = Arc<dyn Fn(&AgentContext<S>) -> bool + Send + Sync>;

/// Either a static prompt string or a function of the activation context.
#[derive(Clone)]
pub enum PromptSource<S> {
    Static(String),
    Dynamic(Arc<dyn Fn(&AgentContext<S>) -> String + Send + Sync>),
}

impl<S> PromptSource<S> {
    pub fn render(&self, ctx: &AgentContext<S>) -> String {
        match self {
            PromptSource::Static(s) => s.clone(),
            PromptSource::Dynamic(f) => f(ctx),
        }
    }
}

/// A passive agent description. `activate_on` patterns determine when the
/// scheduler considers this agent for activation; `emits` is the set of
/// event names it declares it may produce.
pub struct AgentDef<S> {
    pub name: String,
    pub activate_on: PatternSet,
    pub emits: Vec<String>,
    pub guard: Option<Guard<S>>,
    /// State field name to overwrite with the activation's output.
    pub updates: Option<String>,
    pub prompt: PromptSource<S>,
    pub schema: Option<Value>,
    /// Name of the harness to use; `None` defers to the run's default.
    pub harness: Option<String>,
}

impl<S> AgentDef<S> {
    pub fn new<I, P>(name: impl Into<String>, patterns: I, prompt: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            name: name.into(),
            activate_on: PatternSet::compile(patterns),
            emits: Vec::new(),
            guard: None,
            updates: None,
            prompt: PromptSource::Static(prompt.into()),
            schema: None,
            harness: None,
        }
    }

    pub fn emits<I, E>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<String>,
    {
        self.emits = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn guard(mut self, guard: impl Fn(&AgentContext<S>) -> bool + Send + Sync + 'static) -> Self {
        self.guard = Some(Arc::new(guard));
        self
    }

    pub fn updates(mut self, field: impl Into<String>) -> Self {
        self.updates = Some(field.into());
        self
    }

    pub fn prompt_fn(
        mut self,
        f: impl Fn(&AgentContext<S>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.prompt = PromptSource::Dynamic(Arc::new(f));
        self
    }

    pub fn schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn harness(mut self, name: impl Into<String>) -> Self {
        self.harness = Some(name.into());
        self
    }

    /// Evaluate the guard, if any. An agent with no guard always activates.
    pub fn passes_guard(&self, ctx: &AgentContext<S>) -> bool {
        self.guard.as_ref().map_or(true, |g| g(ctx))
    }

    pub fn activates_on(&self, event_name: &str) -> bool {
        self.activate_on.matches(event_name)
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
