// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[derive(Clone, Debug, PartialEq)]
struct Counter {
    n: u32,
}

#[test]
fn get_returns_the_initial_value() {
    let state = StateBox::new(Counter { n: 0 });
    assert_eq!(*state.get(), Counter { n: 0 });
}

#[test]
fn update_commits_a_new_snapshot() {
    let state = StateBox::new(Counter { n: 0 });
    let committed = state.update(|c| c.n += 1);
    assert_eq!(*committed, Counter { n: 1 });
    assert_eq!(*state.get(), Counter { n: 1 });
}

#[test]
fn readers_see_a_frozen_snapshot_across_a_later_write() {
    let state = StateBox::new(Counter { n: 0 });
    let before = state.get();
    state.update(|c| c.n += 1);
    assert_eq!(*before, Counter { n: 0 });
    assert_eq!(*state.get(), Counter { n: 1 });
}

#[test]
fn sequential_updates_accumulate() {
    let state = StateBox::new(Counter { n: 0 });
    for _ in 0..5 {
        state.update(|c| c.n += 1);
    }
    assert_eq!(state.get().n, 5);
}
