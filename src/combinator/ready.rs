//! Already-settled promises.

use crate::promise::Promise;
use crate::runtime::SchedulerRef;

/// Returns a promise already fulfilled with `value`.
///
/// `value` is stored as is; passing a promise yields a nested promise.
#[must_use]
pub fn resolve<T, E>(scheduler: &SchedulerRef, value: T) -> Promise<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    Promise::resolved(scheduler, value)
}

/// Returns a promise already rejected with `reason`.
#[must_use]
pub fn reject<T, E>(scheduler: &SchedulerRef, reason: E) -> Promise<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    Promise::rejected(scheduler, reason)
}
