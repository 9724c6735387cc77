//! First settlement wins.

use super::Operand;
use crate::promise::Promise;
use crate::runtime::SchedulerRef;
use crate::tracing_compat::trace;
use std::cell::Cell;
use std::rc::Rc;

/// Settles with the outcome of the first input to settle.
///
/// Plain values settle the race while `race` iterates, so the first plain
/// value wins over any promise. Every promise input is still observed.
/// Empty input never settles.
pub fn race<T, E, I>(scheduler: &SchedulerRef, items: I) -> Promise<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
    I: IntoIterator<Item = Operand<T, E>>,
{
    let (promise, resolver) = Promise::pending(scheduler);
    let settled = Rc::new(Cell::new(false));
    let mut inputs = 0_usize;

    for item in items {
        inputs += 1;
        let (ok_guard, ok) = (Rc::clone(&settled), resolver.clone());
        let (err_guard, err) = (Rc::clone(&settled), resolver.clone());
        item.observe(
            move |value| {
                if !ok_guard.replace(true) {
                    ok.resolve(value);
                }
            },
            move |reason| {
                if !err_guard.replace(true) {
                    err.reject(reason);
                }
            },
        );
    }
    trace!(promise = %promise.id(), inputs, "race");
    promise
}
