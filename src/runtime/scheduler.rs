//! The deferred-dispatch capability.
//!
//! Promises never run reactions themselves. They hand a flush [`Job`] to a
//! [`Scheduler`], which must run it later, after the current call stack
//! unwinds, in first-scheduled-first-run order. Hosts plug in their own
//! implementation; [`EventLoop`](super::EventLoop) is the reference one.

use super::Job;
use crate::types::PromiseId;
use std::rc::Rc;

/// Shared handle to a scheduler.
pub type SchedulerRef = Rc<dyn Scheduler>;

/// A deferred-dispatch capability.
pub trait Scheduler {
    /// Enqueues `job` to run after the current synchronous execution,
    /// behind every job this scheduler accepted earlier.
    fn schedule(&self, job: Job);

    /// Enqueues `job` to run no earlier than `ticks` timer ticks from now.
    ///
    /// Schedulers without a clock may treat this as [`schedule`](Self::schedule).
    fn schedule_after(&self, ticks: u64, job: Job) {
        let _ = ticks;
        self.schedule(job);
    }

    /// Diagnostic hook: a rejected promise flushed with no rejection
    /// reaction attached.
    fn report_unhandled(&self, promise: PromiseId) {
        let _ = promise;
    }
}

/// Runs every job synchronously inside `schedule`.
///
/// This reproduces the older dispatch strategy where reactions fire during
/// the settling call. It gives up the deferral guarantee: a reaction
/// registered on a settled promise runs before `then` returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl Immediate {
    /// Returns a shared handle to an immediate scheduler.
    #[must_use]
    pub fn handle() -> SchedulerRef {
        Rc::new(Self)
    }
}

impl Scheduler for Immediate {
    fn schedule(&self, job: Job) {
        job.run();
    }
}
