// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use parking_lot::Mutex as StdMutex;
use serde_json::json;

fn event(name: &str) -> Event {
    Event::new(format!("{name}-id"), name, json!({}))
}

#[test]
fn listener_only_receives_matching_events() {
    let bus = EventBus::new();
    let received = Arc::new(StdMutex::new(Vec::new()));
    let captured = received.clone();
    bus.subscribe(["task:*"], Arc::new(move |e: &Event| captured.lock().push(e.name.clone())));

    bus.emit(event("task:ready"));
    bus.emit(event("workflow:start"));

    assert_eq!(*received.lock(), vec!["task:ready".to_string()]);
}

#[test]
fn history_preserves_emission_order() {
    let bus = EventBus::new();
    bus.emit(event("a:1"));
    bus.emit(event("a:2"));
    bus.emit(event("a:3"));

    let names: Vec<_> = bus.history().iter().map(|e| e.name.clone()).collect();
    assert_eq!(names, vec!["a:1", "a:2", "a:3"]);
}

#[test]
fn multiple_listeners_fire_in_subscription_order() {
    let bus = EventBus::new();
    let order = Arc::new(StdMutex::new(Vec::new()));

    let o1 = order.clone();
    bus.subscribe(["**"], Arc::new(move |_: &Event| o1.lock().push(1)));
    let o2 = order.clone();
    bus.subscribe(["**"], Arc::new(move |_: &Event| o2.lock().push(2)));

    bus.emit(event("any:thing"));
    assert_eq!(*order.lock(), vec![1, 2]);
}

#[test]
fn unsubscribe_stops_further_delivery() {
    let bus = EventBus::new();
    let count = Arc::new(StdMutex::new(0));
    let captured = count.clone();
    let id = bus.subscribe(["task:*"], Arc::new(move |_: &Event| *captured.lock() += 1));

    bus.emit(event("task:ready"));
    bus.unsubscribe(id);
    bus.emit(event("task:ready"));

    assert_eq!(*count.lock(), 1);
}

#[test]
fn reentrant_emit_from_a_listener_does_not_deadlock() {
    let bus = Arc::new(EventBus::new());
    let seen = Arc::new(StdMutex::new(Vec::new()));

    let inner_bus = bus.clone();
    let captured = seen.clone();
    bus.subscribe(
        ["parent"],
        Arc::new(move |e: &Event| {
            captured.lock().push(e.name.clone());
            inner_bus.emit(event("child"));
        }),
    );
    let captured2 = seen.clone();
    bus.subscribe(["child"], Arc::new(move |e: &Event| captured2.lock().push(e.name.clone())));

    bus.emit(event("parent"));
    assert_eq!(*seen.lock(), vec!["parent".to_string(), "child".to_string()]);
}

#[test]
fn a_panicking_listener_does_not_stop_delivery_to_others() {
    let bus = EventBus::new();
    let count = Arc::new(StdMutex::new(0));

    bus.subscribe(["**"], Arc::new(|_: &Event| panic!("boom")));
    let captured = count.clone();
    bus.subscribe(["**"], Arc::new(move |_: &Event| *captured.lock() += 1));

    bus.emit(event("task:ready"));

    assert_eq!(*count.lock(), 1);
}
