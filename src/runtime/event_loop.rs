//! Single-threaded event loop with virtual time.
//!
//! The loop owns a FIFO ready queue and a [`TimerHeap`]. Jobs run one at a
//! time; the virtual clock jumps to the next timer deadline only when the
//! ready queue is empty, so every job scheduled "now" runs before any
//! timer fires.
//!
//! # Example
//!
//! ```
//! use pledge::{EventLoop, Promise};
//!
//! let lp = EventLoop::new();
//! let sched = lp.handle();
//! let doubled = Promise::<i32, String>::resolved(&sched, 21).then(|v| Ok(v * 2));
//!
//! lp.run_until_idle().unwrap();
//! assert_eq!(doubled.state().into_result(), Some(Ok(42)));
//! ```

use super::{Job, Scheduler, SchedulerRef, TimerHeap};
use crate::config::LoopConfig;
use crate::error::{ConfigError, LoopError};
use crate::tracing_compat::{trace, warn};
use crate::types::{PromiseId, Tick};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll, Wake, Waker};

/// Counters describing loop activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Jobs run.
    pub jobs_executed: usize,
    /// Virtual ticks the clock advanced.
    pub ticks_elapsed: u64,
    /// Rejected promises flushed without any rejection reaction.
    pub unhandled_rejections: usize,
}

impl RunReport {
    /// Returns the activity between `earlier` and `self`.
    #[must_use]
    pub const fn since(self, earlier: Self) -> Self {
        Self {
            jobs_executed: self.jobs_executed.saturating_sub(earlier.jobs_executed),
            ticks_elapsed: self.ticks_elapsed.saturating_sub(earlier.ticks_elapsed),
            unhandled_rejections: self
                .unhandled_rejections
                .saturating_sub(earlier.unhandled_rejections),
        }
    }
}

struct LoopInner {
    config: LoopConfig,
    ready: RefCell<VecDeque<Job>>,
    timers: RefCell<TimerHeap>,
    now: Cell<Tick>,
    stats: Cell<RunReport>,
    unhandled: RefCell<Vec<PromiseId>>,
}

impl LoopInner {
    fn update_stats(&self, f: impl FnOnce(&mut RunReport)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

impl Scheduler for LoopInner {
    fn schedule(&self, job: Job) {
        self.ready.borrow_mut().push_back(job);
    }

    fn schedule_after(&self, ticks: u64, job: Job) {
        let deadline = self.now.get() + ticks;
        self.timers.borrow_mut().insert(deadline, job);
    }

    fn report_unhandled(&self, promise: PromiseId) {
        let policy = self.config.unhandled_rejections;
        if policy.counts() {
            self.unhandled.borrow_mut().push(promise);
            self.update_stats(|s| s.unhandled_rejections += 1);
        }
        if policy.logs() {
            warn!(promise = %promise, "unhandled promise rejection");
        }
    }
}

/// A single-threaded FIFO scheduler with a virtual clock.
///
/// Cloning an `EventLoop` yields another handle to the same loop.
#[derive(Clone)]
pub struct EventLoop {
    inner: Rc<LoopInner>,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Creates a loop with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::build(LoopConfig::default())
    }

    /// Creates a loop after validating `config`.
    pub fn with_config(config: LoopConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: LoopConfig) -> Self {
        Self {
            inner: Rc::new(LoopInner {
                config,
                ready: RefCell::new(VecDeque::new()),
                timers: RefCell::new(TimerHeap::new()),
                now: Cell::new(Tick::ZERO),
                stats: Cell::new(RunReport::default()),
                unhandled: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Returns the scheduler handle promises dispatch on.
    #[must_use]
    pub fn handle(&self) -> SchedulerRef {
        let inner: Rc<LoopInner> = Rc::clone(&self.inner);
        inner
    }

    /// Returns the loop configuration.
    #[must_use]
    pub fn config(&self) -> &LoopConfig {
        &self.inner.config
    }

    /// Returns the current virtual time.
    #[must_use]
    pub fn now(&self) -> Tick {
        self.inner.now.get()
    }

    /// Returns the number of jobs ready to run.
    #[must_use]
    pub fn pending_jobs(&self) -> usize {
        self.inner.ready.borrow().len()
    }

    /// Returns the number of armed timers.
    #[must_use]
    pub fn armed_timers(&self) -> usize {
        self.inner.timers.borrow().len()
    }

    /// Returns true if a job is ready or a timer is armed.
    #[must_use]
    pub fn has_work(&self) -> bool {
        self.pending_jobs() > 0 || self.armed_timers() > 0
    }

    /// Returns cumulative counters since the loop was created.
    #[must_use]
    pub fn stats(&self) -> RunReport {
        self.inner.stats.get()
    }

    /// Returns the ids of promises reported as unhandled rejections, oldest first.
    #[must_use]
    pub fn unhandled_rejections(&self) -> Vec<PromiseId> {
        self.inner.unhandled.borrow().clone()
    }

    /// Runs one job, advancing the clock to the next timer if nothing is ready.
    ///
    /// Returns false when there was nothing to run.
    pub fn turn(&self) -> bool {
        let next = self.inner.ready.borrow_mut().pop_front();
        let job = match next {
            Some(job) => job,
            None => {
                if !self.fire_timers() {
                    return false;
                }
                match self.inner.ready.borrow_mut().pop_front() {
                    Some(job) => job,
                    None => return false,
                }
            }
        };

        trace!(job = job.label(), now = %self.now(), "running job");
        job.run();
        self.inner.update_stats(|s| s.jobs_executed += 1);
        true
    }

    fn fire_timers(&self) -> bool {
        let mut timers = self.inner.timers.borrow_mut();
        let Some(deadline) = timers.peek_deadline() else {
            return false;
        };
        let now = self.inner.now.get();
        if deadline > now {
            self.inner.now.set(deadline);
            self.inner
                .update_stats(|s| s.ticks_elapsed += deadline.since(now));
        }
        let due = timers.pop_expired(self.inner.now.get());
        drop(timers);

        trace!(count = due.len(), now = %self.now(), "timers fired");
        self.inner.ready.borrow_mut().extend(due);
        true
    }

    /// Runs jobs and timers until both are exhausted.
    ///
    /// Returns the activity of this call, or [`LoopError::BudgetExhausted`]
    /// when `max_jobs_per_run` was reached with work still queued.
    pub fn run_until_idle(&self) -> Result<RunReport, LoopError> {
        let before = self.stats();
        let mut executed = 0;
        loop {
            self.check_budget(executed)?;
            if !self.turn() {
                break;
            }
            executed += 1;
        }
        Ok(self.stats().since(before))
    }

    fn check_budget(&self, executed: usize) -> Result<(), LoopError> {
        match self.inner.config.max_jobs_per_run {
            Some(budget) if executed >= budget && self.has_work() => {
                let remaining = self.pending_jobs() + self.armed_timers();
                warn!(executed, budget, remaining, "event loop budget exhausted");
                Err(LoopError::BudgetExhausted {
                    executed,
                    budget,
                    remaining,
                })
            }
            _ => Ok(()),
        }
    }

    /// Drives the loop until `future` completes.
    ///
    /// The future is polled whenever its waker fired. Returns
    /// [`LoopError::Stalled`] if the loop runs dry while the future is still
    /// pending.
    pub fn block_on<F: Future>(&self, future: F) -> Result<F::Output, LoopError> {
        let flag = Arc::new(WakeFlag(AtomicBool::new(true)));
        let waker = Waker::from(Arc::clone(&flag));
        let mut cx = Context::from_waker(&waker);
        let mut future = std::pin::pin!(future);
        let mut executed = 0;

        loop {
            if flag.take() {
                if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
                    return Ok(output);
                }
            }
            self.check_budget(executed)?;
            if self.turn() {
                executed += 1;
            } else if !flag.is_set() {
                return Err(LoopError::Stalled { executed });
            }
        }
    }
}

impl std::fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoop")
            .field("now", &self.now())
            .field("pending_jobs", &self.pending_jobs())
            .field("armed_timers", &self.armed_timers())
            .field("stats", &self.stats())
            .finish()
    }
}

struct WakeFlag(AtomicBool);

impl WakeFlag {
    fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Wake for WakeFlag {
    fn wake(self: Arc<Self>) {
        self.0.store(true, Ordering::Release);
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.0.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnhandledRejectionPolicy;
    use crate::test_utils::{Recorder, init_test_logging};

    #[test]
    fn jobs_run_in_fifo_order() {
        init_test_logging();
        crate::test_phase!("jobs_run_in_fifo_order");

        let lp = EventLoop::new();
        let log = Recorder::new();
        for i in 0..3 {
            let log = log.clone();
            lp.handle().schedule(Job::new(move || log.push(i)));
        }
        assert_eq!(lp.pending_jobs(), 3);
        assert!(log.is_empty());

        let report = lp.run_until_idle().unwrap();
        assert_eq!(report.jobs_executed, 3);
        assert_eq!(log.take(), vec![0, 1, 2]);
        assert!(!lp.has_work());
    }

    #[test]
    fn jobs_scheduled_by_jobs_run_after_existing_ones() {
        init_test_logging();
        let lp = EventLoop::new();
        let log = Recorder::new();
        let sched = lp.handle();

        let inner_log = log.clone();
        let inner_sched = Rc::clone(&sched);
        sched.schedule(Job::new(move || {
            inner_log.push("outer");
            let nested_log = inner_log.clone();
            inner_sched.schedule(Job::new(move || nested_log.push("nested")));
        }));
        let tail = log.clone();
        sched.schedule(Job::new(move || tail.push("second")));

        lp.run_until_idle().unwrap();
        assert_eq!(log.take(), vec!["outer", "second", "nested"]);
    }

    #[test]
    fn timers_fire_after_ready_queue_drains() {
        init_test_logging();
        let lp = EventLoop::new();
        let log = Recorder::new();
        let sched = lp.handle();

        let l = log.clone();
        sched.schedule_after(5, Job::new(move || l.push("t5")));
        let l = log.clone();
        sched.schedule_after(0, Job::new(move || l.push("t0")));
        let l = log.clone();
        sched.schedule(Job::new(move || l.push("now")));

        let report = lp.run_until_idle().unwrap();
        assert_eq!(log.take(), vec!["now", "t0", "t5"]);
        assert_eq!(lp.now(), Tick::new(5));
        assert_eq!(report.ticks_elapsed, 5);
    }

    #[test]
    fn turn_returns_false_when_idle() {
        let lp = EventLoop::new();
        assert!(!lp.turn());
        assert_eq!(lp.stats(), RunReport::default());
    }

    #[test]
    fn budget_exhaustion_is_reported() {
        init_test_logging();
        let lp = EventLoop::with_config(LoopConfig::new().max_jobs_per_run(2)).unwrap();
        for _ in 0..3 {
            lp.handle().schedule(Job::new(|| {}));
        }
        let err = lp.run_until_idle().unwrap_err();
        assert_eq!(
            err,
            LoopError::BudgetExhausted {
                executed: 2,
                budget: 2,
                remaining: 1
            }
        );
        // A fresh run gets a fresh budget.
        assert_eq!(lp.run_until_idle().unwrap().jobs_executed, 1);
    }

    #[test]
    fn budget_matching_work_exactly_is_fine() {
        let lp = EventLoop::with_config(LoopConfig::new().max_jobs_per_run(2)).unwrap();
        lp.handle().schedule(Job::new(|| {}));
        lp.handle().schedule(Job::new(|| {}));
        assert_eq!(lp.run_until_idle().unwrap().jobs_executed, 2);
    }

    #[test]
    fn with_config_rejects_zero_budget() {
        assert!(EventLoop::with_config(LoopConfig::new().max_jobs_per_run(0)).is_err());
    }

    #[test]
    fn unhandled_policy_controls_counting() {
        let counting = EventLoop::with_config(
            LoopConfig::new().unhandled_rejections(UnhandledRejectionPolicy::Count),
        )
        .unwrap();
        counting
            .handle()
            .report_unhandled(PromiseId::new_for_test(9));
        assert_eq!(counting.stats().unhandled_rejections, 1);
        assert_eq!(counting.unhandled_rejections(), vec![PromiseId::new_for_test(9)]);

        let ignoring = EventLoop::with_config(
            LoopConfig::new().unhandled_rejections(UnhandledRejectionPolicy::Ignore),
        )
        .unwrap();
        ignoring
            .handle()
            .report_unhandled(PromiseId::new_for_test(9));
        assert_eq!(ignoring.stats().unhandled_rejections, 0);
        assert!(ignoring.unhandled_rejections().is_empty());
    }

    #[test]
    fn block_on_drives_jobs_until_ready() {
        let lp = EventLoop::new();
        let done = Rc::new(Cell::new(false));
        let flag = Rc::clone(&done);
        lp.handle().schedule_after(3, Job::new(move || flag.set(true)));

        let probe = Rc::clone(&done);
        let waits = std::future::poll_fn(move |cx| {
            if probe.get() {
                Poll::Ready("done")
            } else {
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        });
        assert_eq!(lp.block_on(waits).unwrap(), "done");
        assert_eq!(lp.now(), Tick::new(3));
    }

    #[test]
    fn block_on_reports_stall() {
        let lp = EventLoop::new();
        let err = lp.block_on(std::future::pending::<()>()).unwrap_err();
        assert_eq!(err, LoopError::Stalled { executed: 0 });
    }

    #[test]
    fn debug_lists_counters() {
        let lp = EventLoop::new();
        let debug = format!("{lp:?}");
        assert!(debug.contains("EventLoop"));
        assert!(debug.contains("pending_jobs"));
    }
}
