// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The update pipeline: reducers, then handlers, then process managers, in
//! that fixed order for every event. Reducers mutate state only. Handlers
//! mutate state and may declare events to emit. Process managers are
//! read-only and may declare events to emit. State mutation and event
//! emission are kept as separate stages (mutate, commit, *then* emit) so
//! that an emitted event re-entering the pipeline never nests inside an
//! in-flight `StateBox::update`.

use std::sync::Arc;

use skein_core::{Event, PatternSet};

use crate::bus::EventBus;
use crate::state_box::StateBox;

pub type Reducer<S> = Arc<dyn Fn(&Event, &mut S) + Send + Sync>;
pub type Handler<S> = Arc<dyn Fn(&Event, &mut S) -> Vec<Event> + Send + Sync>;
pub type ProcessManager<S> = Arc<dyn Fn(&Event, &S) -> Vec<Event> + Send + Sync>;

struct Binding<F> {
    patterns: PatternSet,
    action: F,
}

/// Builds the fixed reducer → handler → process-manager pipeline for a
/// workflow's state type and wires it onto a bus.
pub struct UpdatePipeline<S> {
    reducers: Vec<Binding<Reducer<S>>>,
    handlers: Vec<Binding<Handler<S>>>,
    processes: Vec<Binding<ProcessManager<S>>>,
}

impl<S> Default for UpdatePipeline<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> UpdatePipeline<S> {
    pub fn new() -> Self {
        Self {
            reducers: Vec::new(),
            handlers: Vec::new(),
            processes: Vec::new(),
        }
    }

    pub fn reducer(
        mut self,
        patterns: impl IntoIterator<Item = impl Into<String>>,
        action: Reducer<S>,
    ) -> Self {
        self.reducers.push(Binding {
            patterns: PatternSet::compile(patterns),
            action,
        });
        self
    }

    pub fn handler(
        mut self,
        patterns: impl IntoIterator<Item = impl Into<String>>,
        action: Handler<S>,
    ) -> Self {
        self.handlers.push(Binding {
            patterns: PatternSet::compile(patterns),
            action,
        });
        self
    }

    pub fn process(
        mut self,
        patterns: impl IntoIterator<Item = impl Into<String>>,
        action: ProcessManager<S>,
    ) -> Self {
        self.processes.push(Binding {
            patterns: PatternSet::compile(patterns),
            action,
        });
        self
    }
}

impl<S: Clone + Send + Sync + 'static> UpdatePipeline<S> {
    /// Runs one event through reducers, then handlers, then process
    /// managers, emitting any declared events onto `bus` once each stage's
    /// state mutation has been committed.
    pub fn handle(&self, event: &Event, state: &StateBox<S>, bus: &EventBus) {
        if !self.reducers.is_empty() {
            state.update(|s| {
                for binding in &self.reducers {
                    if binding.patterns.matches(&event.name) {
                        (binding.action)(event, s);
                    }
                }
            });
        }

        let mut to_emit = Vec::new();
        if !self.handlers.is_empty() {
            state.update(|s| {
                for binding in &self.handlers {
                    if binding.patterns.matches(&event.name) {
                        to_emit.extend((binding.action)(event, s));
                    }
                }
            });
        }
        for emitted in to_emit {
            bus.emit(emitted);
        }

        let snapshot = state.get();
        let mut to_emit = Vec::new();
        for binding in &self.processes {
            if binding.patterns.matches(&event.name) {
                to_emit.extend((binding.action)(event, &snapshot));
            }
        }
        for emitted in to_emit {
            bus.emit(emitted);
        }
    }

    /// Subscribes this pipeline to every event on `bus`, driving `handle`
    /// for each one. Takes `bus` as an `Arc` (rather than a plain
    /// reference) because the installed listener must hold its own
    /// reference to the bus in order to emit derived events back onto it.
    pub fn install(self: Arc<Self>, bus: &Arc<EventBus>, state: Arc<StateBox<S>>) {
        let pipeline = self;
        let bus_handle = bus.clone();
        bus.subscribe(
            ["**"],
            Arc::new(move |event: &Event| {
                pipeline.handle(event, &state, &bus_handle);
            }),
        );
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
