//! Timer-driven fulfillment.

use crate::promise::Promise;
use crate::runtime::{Job, SchedulerRef};

/// Returns a promise fulfilled with `value` after `ticks` timer ticks.
///
/// Schedulers without a clock run the timer as an ordinary deferred job.
pub fn delay<T, E>(scheduler: &SchedulerRef, ticks: u64, value: T) -> Promise<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    let (promise, resolver) = Promise::pending(scheduler);
    scheduler.schedule_after(
        ticks,
        Job::labeled("delay", move || {
            resolver.resolve(value);
        }),
    );
    promise
}
