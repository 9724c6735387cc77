//! Shared promise state and the settlement/flush state machine.
//!
//! Every handle, capability and queued reaction for one promise points at
//! the same `Core`. All mutation goes through `Core::settle`,
//! `Core::register` and the flush job; none of them holds the `RefCell`
//! borrow while calling into the scheduler or user code.

use super::reaction::Reaction;
use crate::runtime::{Job, SchedulerRef};
use crate::tracing_compat::{debug, trace};
use crate::types::{PromiseId, PromiseState, Status};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

type Reactions<T, E> = SmallVec<[Reaction<T, E>; 4]>;

struct Slot<T, E> {
    state: PromiseState<T, E>,
    reactions: Reactions<T, E>,
    dispatch_pending: bool,
}

pub(crate) struct Core<T, E> {
    id: PromiseId,
    scheduler: SchedulerRef,
    slot: RefCell<Slot<T, E>>,
}

impl<T, E> Core<T, E> {
    pub(crate) const fn id(&self) -> PromiseId {
        self.id
    }

    pub(crate) fn scheduler(&self) -> &SchedulerRef {
        &self.scheduler
    }

    pub(crate) fn status(&self) -> Status {
        self.slot.borrow().state.status()
    }

    pub(crate) fn queued(&self) -> usize {
        self.slot.borrow().reactions.len()
    }

    #[cfg(test)]
    pub(crate) fn queued_kinds(&self) -> Vec<super::reaction::ReactionKind> {
        self.slot
            .borrow()
            .reactions
            .iter()
            .map(Reaction::kind)
            .collect()
    }
}

impl<T, E> Core<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    pub(crate) fn new(scheduler: SchedulerRef) -> Rc<Self> {
        Rc::new(Self {
            id: PromiseId::next(),
            scheduler,
            slot: RefCell::new(Slot {
                state: PromiseState::Pending,
                reactions: SmallVec::new(),
                dispatch_pending: false,
            }),
        })
    }

    pub(crate) fn snapshot(&self) -> PromiseState<T, E> {
        self.slot.borrow().state.clone()
    }

    pub(crate) fn fulfill(self: &Rc<Self>, value: T) -> bool {
        self.settle(PromiseState::Fulfilled(value))
    }

    pub(crate) fn reject(self: &Rc<Self>, reason: E) -> bool {
        self.settle(PromiseState::Rejected(reason))
    }

    /// Performs the one-time transition. Returns false if already settled.
    fn settle(self: &Rc<Self>, outcome: PromiseState<T, E>) -> bool {
        {
            let mut slot = self.slot.borrow_mut();
            if !slot.state.is_pending() {
                debug!(
                    promise = %self.id,
                    status = %slot.state.status(),
                    attempted = %outcome.status(),
                    "late settlement ignored"
                );
                return false;
            }
            trace!(promise = %self.id, status = %outcome.status(), "settled");
            slot.state = outcome;
        }
        self.request_flush();
        true
    }

    pub(crate) fn register(self: &Rc<Self>, reaction: Reaction<T, E>) {
        self.register_all([reaction]);
    }

    /// Queues reactions in order; requests a flush if already settled.
    pub(crate) fn register_all<const N: usize>(self: &Rc<Self>, reactions: [Reaction<T, E>; N]) {
        let settled = {
            let mut slot = self.slot.borrow_mut();
            slot.reactions.extend(reactions);
            !slot.state.is_pending()
        };
        if settled {
            self.request_flush();
        }
    }

    fn request_flush(self: &Rc<Self>) {
        {
            let mut slot = self.slot.borrow_mut();
            if slot.dispatch_pending {
                return;
            }
            slot.dispatch_pending = true;
        }
        let core = Rc::clone(self);
        self.scheduler
            .schedule(Job::labeled("promise-flush", move || core.flush()));
    }

    /// Runs every reaction queued so far. Reactions registered while this
    /// runs land in a fresh list and get their own flush.
    fn flush(&self) {
        let (outcome, reactions) = {
            let mut slot = self.slot.borrow_mut();
            slot.dispatch_pending = false;
            if slot.state.is_pending() {
                return;
            }
            (slot.state.clone(), mem::take(&mut slot.reactions))
        };

        match outcome {
            PromiseState::Fulfilled(value) => {
                trace!(promise = %self.id, reactions = reactions.len(), "flushing fulfilled");
                for reaction in reactions {
                    match reaction {
                        Reaction::OnFulfilled(handler) => handler(value.clone()),
                        Reaction::OnFinally(handler) => handler(),
                        Reaction::OnRejected { .. } => {}
                    }
                }
            }
            PromiseState::Rejected(reason) => {
                let mut rejection_reactions = 0_usize;
                let mut supplied_handlers = 0_usize;
                for reaction in &reactions {
                    if let Reaction::OnRejected { supplied, .. } = reaction {
                        rejection_reactions += 1;
                        supplied_handlers += usize::from(*supplied);
                    }
                }
                trace!(
                    promise = %self.id,
                    reactions = reactions.len(),
                    rejection_reactions,
                    supplied_handlers,
                    "flushing rejected"
                );
                if rejection_reactions == 0 {
                    self.scheduler.report_unhandled(self.id);
                }
                for reaction in reactions {
                    match reaction {
                        Reaction::OnRejected { handler, .. } => handler(reason.clone()),
                        Reaction::OnFinally(handler) => handler(),
                        Reaction::OnFulfilled(_) => {}
                    }
                }
            }
            PromiseState::Pending => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::promise::reaction::ReactionKind;
    use crate::runtime::EventLoop;
    use crate::test_utils::{Recorder, init_test_logging};

    fn core(lp: &EventLoop) -> Rc<Core<i32, &'static str>> {
        Core::new(lp.handle())
    }

    #[test]
    fn settlement_is_write_once() {
        init_test_logging();
        crate::test_phase!("settlement_is_write_once");

        let lp = EventLoop::new();
        let c = core(&lp);
        assert_eq!(c.status(), Status::Pending);
        assert!(c.fulfill(1));
        assert!(!c.fulfill(2));
        assert!(!c.reject("late"));
        assert_eq!(c.snapshot(), PromiseState::Fulfilled(1));
    }

    #[test]
    fn pending_registration_schedules_nothing() {
        let lp = EventLoop::new();
        let c = core(&lp);
        c.register(Reaction::fulfilled(|_| {}));
        assert_eq!(lp.pending_jobs(), 0);
        assert_eq!(c.queued(), 1);
    }

    #[test]
    fn settlement_and_registration_coalesce_into_one_flush() {
        let lp = EventLoop::new();
        let c = core(&lp);
        c.fulfill(5);
        c.register(Reaction::fulfilled(|_| {}));
        c.register(Reaction::finally(|| {}));
        assert_eq!(lp.pending_jobs(), 1);
    }

    #[test]
    fn flush_runs_matching_reactions_in_order() {
        init_test_logging();
        let lp = EventLoop::new();
        let c = core(&lp);
        let log = Recorder::new();

        let l = log.clone();
        c.register(Reaction::fulfilled(move |v| l.push(format!("a{v}"))));
        let l = log.clone();
        c.register(Reaction::rejected(move |e| l.push(format!("never {e}"))));
        let l = log.clone();
        c.register(Reaction::finally(move || l.push("fin".to_string())));
        let l = log.clone();
        c.register(Reaction::fulfilled(move |v| l.push(format!("b{v}"))));
        assert_eq!(
            c.queued_kinds(),
            vec![
                ReactionKind::OnFulfilled,
                ReactionKind::OnRejected,
                ReactionKind::OnFinally,
                ReactionKind::OnFulfilled
            ]
        );

        c.fulfill(7);
        assert!(log.is_empty());
        lp.run_until_idle().unwrap();
        assert_eq!(log.take(), vec!["a7", "fin", "b7"]);
        assert_eq!(c.queued(), 0);
    }

    #[test]
    fn registration_during_flush_gets_a_new_flush() {
        init_test_logging();
        let lp = EventLoop::new();
        let c = core(&lp);
        let log = Recorder::new();

        let inner = Rc::clone(&c);
        let l = log.clone();
        c.register(Reaction::fulfilled(move |_| {
            l.push("first");
            let l2 = l.clone();
            inner.register(Reaction::fulfilled(move |_| l2.push("late")));
            l.push("first-done");
        }));
        let l = log.clone();
        c.register(Reaction::fulfilled(move |_| l.push("second")));

        c.fulfill(0);
        assert!(lp.turn());
        assert_eq!(log.snapshot(), vec!["first", "first-done", "second"]);
        assert_eq!(lp.pending_jobs(), 1);

        lp.run_until_idle().unwrap();
        assert_eq!(log.take(), vec!["first", "first-done", "second", "late"]);
    }

    #[test]
    fn rejection_without_reactions_is_reported() {
        init_test_logging();
        let lp = EventLoop::new();
        let c = core(&lp);
        c.reject("boom");
        lp.run_until_idle().unwrap();
        assert_eq!(lp.unhandled_rejections(), vec![c.id()]);
    }

    #[test]
    fn pass_through_rejection_counts_as_handled() {
        let lp = EventLoop::new();
        let c = core(&lp);
        c.register(Reaction::pass_rejection(|_| {}));
        c.reject("boom");
        lp.run_until_idle().unwrap();
        assert!(lp.unhandled_rejections().is_empty());
    }

    #[test]
    fn finally_alone_does_not_handle_rejection() {
        let lp = EventLoop::new();
        let c = core(&lp);
        let log = Recorder::new();
        let l = log.clone();
        c.register(Reaction::finally(move || l.push(())));
        c.reject("boom");
        lp.run_until_idle().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(lp.stats().unhandled_rejections, 1);
    }
}
