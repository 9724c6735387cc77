//! Wait for every input.
//!
//! [`all`] fulfills with the inputs' values in input order once every input
//! fulfilled, or rejects with the first rejection. Inputs that settle after
//! the outcome is decided are still observed, and ignored.

use super::Operand;
use crate::promise::{Promise, Resolver};
use crate::runtime::SchedulerRef;
use crate::tracing_compat::trace;
use std::cell::RefCell;
use std::rc::Rc;

struct Gather<T> {
    slots: Vec<Option<T>>,
    remaining: usize,
}

impl<T> Gather<T> {
    fn new(len: usize) -> Self {
        Self {
            slots: std::iter::repeat_with(|| None).take(len).collect(),
            remaining: len,
        }
    }

    /// Stores one value; returns the full set once the last one arrived.
    fn record(&mut self, index: usize, value: T) -> Option<Vec<T>> {
        if self.slots[index].replace(value).is_none() {
            self.remaining -= 1;
        }
        if self.remaining == 0 {
            Some(self.slots.drain(..).flatten().collect())
        } else {
            None
        }
    }
}

fn arrive<T, E>(gather: &RefCell<Gather<T>>, resolver: &Resolver<Vec<T>, E>, index: usize, value: T)
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    let complete = gather.borrow_mut().record(index, value);
    if let Some(values) = complete {
        resolver.resolve(values);
    }
}

/// Collects every input's value, preserving input positions.
///
/// Empty input fulfills with an empty `Vec`.
pub fn all<T, E, I>(scheduler: &SchedulerRef, items: I) -> Promise<Vec<T>, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
    I: IntoIterator<Item = Operand<T, E>>,
{
    let items: Vec<_> = items.into_iter().collect();
    let (promise, resolver) = Promise::pending(scheduler);
    trace!(promise = %promise.id(), inputs = items.len(), "all");
    if items.is_empty() {
        resolver.resolve(Vec::new());
        return promise;
    }

    let gather = Rc::new(RefCell::new(Gather::new(items.len())));
    for (index, item) in items.into_iter().enumerate() {
        let on_value = (Rc::clone(&gather), resolver.clone());
        let on_reason = resolver.clone();
        item.observe(
            move |value| arrive(&on_value.0, &on_value.1, index, value),
            move |reason| {
                on_reason.reject(reason);
            },
        );
    }
    promise
}
