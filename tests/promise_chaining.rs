//! Chaining semantics: flattening, error propagation, recovery and finally.

mod common;

use common::*;
use pledge::{EventLoop, Promise, Resolution, Status, Thenable};
use std::cell::RefCell;
use std::rc::Rc;

type P<T> = Promise<T, String>;

#[test]
fn settlement_is_idempotent() {
    init_test("settlement_is_idempotent");

    let lp = EventLoop::new();
    let calls = Recorder::new();
    let (p, resolver) = P::<i32>::pending(&lp.handle());
    let c = calls.clone();
    p.then(move |v| {
        c.push(v);
        Ok(())
    });

    assert!(resolver.resolve(1));
    assert!(!resolver.resolve(2));
    assert!(!resolver.reject("late".into()));
    settle(&lp);
    assert!(!resolver.resolve(3));
    settle(&lp);

    assert_eq!(fulfilled(&p), 1);
    assert_eq!(calls.take(), vec![1]);
}

#[test]
fn then_flattens_a_returned_promise() {
    init_test("then_flattens_a_returned_promise");

    let lp = EventLoop::new();
    let sched = lp.handle();
    let s = sched.clone();
    let p = P::resolved(&sched, 1).then(move |v| P::resolved(&s, v + 1));
    settle(&lp);
    assert_eq!(fulfilled(&p), 2);
}

#[test]
fn then_follows_a_rejected_returned_promise() {
    let lp = EventLoop::new();
    let sched = lp.handle();
    let s = sched.clone();
    let p = P::resolved(&sched, 1).then(move |_| P::<i32>::rejected(&s, "inner".into()));
    settle(&lp);
    assert_eq!(rejected(&p), "inner");
}

#[test]
fn handler_error_becomes_rejection() {
    init_test("handler_error_becomes_rejection");

    let lp = EventLoop::new();
    let p = P::resolved(&lp.handle(), 10).then(|_| Err::<i32, _>("handler failed".to_string()));
    settle(&lp);
    assert_eq!(rejected(&p), "handler failed");
}

#[test]
fn rejection_passes_through_then_to_first_catch() {
    init_test("rejection_passes_through_then_to_first_catch");

    let lp = EventLoop::new();
    let skipped = Recorder::new();
    let s1 = skipped.clone();
    let s2 = skipped.clone();
    let s3 = skipped.clone();

    let caught = P::<i32>::rejected(&lp.handle(), "root".into())
        .then(move |v| {
            s1.push(v);
            Ok(v + 1)
        })
        .then(move |v| {
            s2.push(v);
            Ok(v + 1)
        })
        .catch(|reason| Ok(reason.len() as i32))
        .catch(move |_| {
            s3.push(-1);
            Ok(0)
        });
    settle(&lp);

    assert_eq!(fulfilled(&caught), 4);
    assert!(skipped.is_empty());
    assert!(lp.unhandled_rejections().is_empty());
}

#[test]
fn catch_recovers_and_chain_continues() {
    let lp = EventLoop::new();
    let p = P::<i32>::rejected(&lp.handle(), "x".into())
        .catch(|_| Ok(5))
        .then(|v| Ok::<_, String>(v * 10));
    settle(&lp);
    assert_eq!(fulfilled(&p), 50);
}

#[test]
fn finally_does_not_alter_outcome() {
    init_test("finally_does_not_alter_outcome");

    let lp = EventLoop::new();
    let sched = lp.handle();
    let ran = Recorder::new();

    let r = ran.clone();
    let ok = P::resolved(&sched, 3).finally(move || r.push("ok"));
    let r = ran.clone();
    let err = P::<i32>::rejected(&sched, "bad".into())
        .finally(move || r.push("err"))
        .catch(|reason| Ok(reason.len() as i32));
    settle(&lp);

    assert_eq!(fulfilled(&ok), 3);
    assert_eq!(fulfilled(&err), 3);
    assert_eq!(ran.take(), vec!["ok", "err"]);
}

#[test]
fn then_or_rejection_handler_result_settles_derived() {
    let lp = EventLoop::new();
    let p = P::<i32>::rejected(&lp.handle(), "boom".into()).then_or(
        |v| Ok(format!("ok {v}")),
        |reason| Err(format!("wrapped {reason}")),
    );
    settle(&lp);
    assert_eq!(rejected(&p), "wrapped boom");
}

#[test]
fn explicit_resolution_values_work() {
    let lp = EventLoop::new();
    let sched = lp.handle();
    let s = sched.clone();
    let a = P::resolved(&sched, 1).then(|v| Resolution::Fulfill(v + 1));
    let b = P::resolved(&sched, 1).then(|_| Resolution::<i32, String>::Reject("no".into()));
    let c = P::resolved(&sched, 1).then(move |v| Resolution::adopt(P::resolved(&s, v + 2)));
    settle(&lp);
    assert_eq!(fulfilled(&a), 2);
    assert_eq!(rejected(&b), "no");
    assert_eq!(fulfilled(&c), 3);
}

/// A callback-style source that settles when told to.
#[derive(Clone, Default)]
struct Deferred {
    waiting: Rc<RefCell<Vec<Box<dyn FnOnce(i32)>>>>,
}

impl Deferred {
    fn fire(&self, value: i32) {
        let waiting = std::mem::take(&mut *self.waiting.borrow_mut());
        for callback in waiting {
            callback(value);
        }
    }
}

impl Thenable<i32, String> for Deferred {
    fn subscribe(self: Box<Self>, on_fulfilled: Box<dyn FnOnce(i32)>, _on_rejected: Box<dyn FnOnce(String)>) {
        self.waiting.borrow_mut().push(on_fulfilled);
    }
}

#[test]
fn foreign_thenable_is_adopted() {
    init_test("foreign_thenable_is_adopted");

    let lp = EventLoop::new();
    let source = Deferred::default();
    let s = source.clone();
    let p = P::resolved(&lp.handle(), 0).then(move |_| {
        let boxed: Box<dyn Thenable<i32, String>> = Box::new(s);
        boxed
    });
    settle(&lp);
    assert_eq!(p.status(), Status::Pending);

    source.fire(12);
    settle(&lp);
    assert_eq!(fulfilled(&p), 12);
}

#[test]
fn new_with_initializer_error_path() {
    let lp = EventLoop::new();
    let p = P::<i32>::try_new(&lp.handle(), |_, _| Err("no input".into()));
    let recovered = p.catch(|reason| Ok(reason.len() as i32));
    settle(&lp);
    assert_eq!(fulfilled(&recovered), 8);
}

#[test]
fn awaiting_a_chain_through_block_on() {
    init_test("awaiting_a_chain_through_block_on");

    let lp = EventLoop::new();
    let sched = lp.handle();
    let (p, resolver) = P::<i32>::pending(&sched);
    let doubled = p.then(|v| Ok(v * 2));
    resolver.resolve(21);

    let out = lp.block_on(async move { doubled.await }).expect("loop");
    assert_eq!(out, Ok(42));
}
