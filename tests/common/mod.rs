//! Shared helpers for integration tests.

#![allow(dead_code)]

pub use pledge::test_utils::{Recorder, init_test_logging};
pub use pledge::test_phase;

use pledge::{EventLoop, Promise, PromiseState};

pub fn init_test(name: &str) {
    init_test_logging();
    test_phase!(name);
}

/// Drives the loop dry, failing the test on a loop error.
pub fn settle(lp: &EventLoop) {
    lp.run_until_idle().expect("event loop run");
}

pub fn fulfilled<T: Clone + 'static, E: Clone + 'static>(p: &Promise<T, E>) -> T {
    match p.state() {
        PromiseState::Fulfilled(value) => value,
        other => panic!("expected {} to be fulfilled, was {}", p.id(), other.status()),
    }
}

pub fn rejected<T: Clone + 'static, E: Clone + 'static>(p: &Promise<T, E>) -> E {
    match p.state() {
        PromiseState::Rejected(reason) => reason,
        other => panic!("expected {} to be rejected, was {}", p.id(), other.status()),
    }
}
