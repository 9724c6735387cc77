//! The promise: a value or failure that is not known yet.
//!
//! A [`Promise`] starts Pending and settles exactly once, either Fulfilled
//! with a `T` or Rejected with an `E`. Consumers attach reactions with
//! [`then`](Promise::then), [`then_or`](Promise::then_or),
//! [`catch`](Promise::catch) and [`finally`](Promise::finally).
//!
//! # Dispatch
//!
//! Reactions never run inside the call that registers them or the call
//! that settles the promise. Settlement (and registration on an already
//! settled promise) asks the promise's [`Scheduler`](crate::runtime::Scheduler)
//! for one flush job; further requests coalesce until that job runs. The
//! flush takes the queued reactions and runs those matching the outcome in
//! registration order. Reactions registered while a flush is running are
//! deferred to a new flush rather than drained by the running one.
//!
//! # Example
//!
//! ```
//! use pledge::{EventLoop, Promise};
//!
//! let lp = EventLoop::new();
//! let sched = lp.handle();
//!
//! let (promise, resolver) = Promise::<u32, String>::pending(&sched);
//! let label = promise
//!     .then(|n| if n > 10 { Ok(n) } else { Err(format!("{n} is too small")) })
//!     .catch(|_| Ok(10))
//!     .then(|n| Ok::<_, String>(format!("n={n}")));
//!
//! resolver.resolve(3);
//! lp.run_until_idle().unwrap();
//! assert_eq!(label.state().into_result(), Some(Ok("n=10".to_string())));
//! ```

mod awaiting;
pub(crate) mod core;
pub mod reaction;
pub mod resolution;
pub mod resolver;

pub use awaiting::Settled;
pub use reaction::ReactionKind;
pub use resolution::{IntoResolution, Resolution, Thenable};
pub use resolver::{Reject, Resolve, Resolver};

use self::core::Core;
use self::reaction::Reaction;
use self::resolution::settle_with;
use crate::runtime::SchedulerRef;
use crate::types::{PromiseId, PromiseState, Status};
use std::fmt;
use std::rc::Rc;

/// A handle to a deferred value.
///
/// Cloning the handle is cheap and refers to the same promise.
pub struct Promise<T, E> {
    core: Rc<Core<T, E>>,
}

impl<T, E> Promise<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Creates a promise and runs `initializer` synchronously with its
    /// settlement capabilities.
    pub fn new<F>(scheduler: &SchedulerRef, initializer: F) -> Self
    where
        F: FnOnce(Resolve<T, E>, Reject<T, E>),
    {
        let core = Core::new(Rc::clone(scheduler));
        initializer(Resolve::new(Rc::clone(&core)), Reject::new(Rc::clone(&core)));
        Self { core }
    }

    /// Like [`new`](Self::new), but an `Err` returned by `initializer`
    /// rejects the promise (unless it already settled).
    pub fn try_new<F>(scheduler: &SchedulerRef, initializer: F) -> Self
    where
        F: FnOnce(Resolve<T, E>, Reject<T, E>) -> Result<(), E>,
    {
        let core = Core::new(Rc::clone(scheduler));
        if let Err(reason) = initializer(Resolve::new(Rc::clone(&core)), Reject::new(Rc::clone(&core))) {
            core.reject(reason);
        }
        Self { core }
    }

    /// Creates a pending promise together with its resolver.
    #[must_use]
    pub fn pending(scheduler: &SchedulerRef) -> (Self, Resolver<T, E>) {
        let core = Core::new(Rc::clone(scheduler));
        let resolver = Resolver::new(&core);
        (Self { core }, resolver)
    }

    /// Creates a promise already fulfilled with `value`.
    ///
    /// No unwrapping happens here: a `Promise<Promise<U, E>, E>` stays nested.
    #[must_use]
    pub fn resolved(scheduler: &SchedulerRef, value: T) -> Self {
        Self::new(scheduler, |resolve, _| {
            resolve.resolve(value);
        })
    }

    /// Creates a promise already rejected with `reason`.
    #[must_use]
    pub fn rejected(scheduler: &SchedulerRef, reason: E) -> Self {
        Self::new(scheduler, |_, reject| {
            reject.reject(reason);
        })
    }

    /// Chains a fulfillment handler. Rejections pass through unchanged.
    pub fn then<U, F, R>(&self, on_fulfilled: F) -> Promise<U, E>
    where
        U: Clone + 'static,
        F: FnOnce(T) -> R + 'static,
        R: IntoResolution<U, E>,
    {
        let derived = Core::new(Rc::clone(self.core.scheduler()));
        let on_ok = Rc::clone(&derived);
        let on_err = Rc::clone(&derived);
        self.core.register_all([
            Reaction::fulfilled(move |value| settle_with(&on_ok, on_fulfilled(value).into_resolution())),
            Reaction::pass_rejection(move |reason| {
                on_err.reject(reason);
            }),
        ]);
        Promise { core: derived }
    }

    /// Chains both a fulfillment and a rejection handler.
    pub fn then_or<U, F, R, G, S>(&self, on_fulfilled: F, on_rejected: G) -> Promise<U, E>
    where
        U: Clone + 'static,
        F: FnOnce(T) -> R + 'static,
        R: IntoResolution<U, E>,
        G: FnOnce(E) -> S + 'static,
        S: IntoResolution<U, E>,
    {
        let derived = Core::new(Rc::clone(self.core.scheduler()));
        let on_ok = Rc::clone(&derived);
        let on_err = Rc::clone(&derived);
        self.core.register_all([
            Reaction::fulfilled(move |value| settle_with(&on_ok, on_fulfilled(value).into_resolution())),
            Reaction::rejected(move |reason| settle_with(&on_err, on_rejected(reason).into_resolution())),
        ]);
        Promise { core: derived }
    }

    /// Chains a rejection handler. Values pass through unchanged.
    pub fn catch<G, S>(&self, on_rejected: G) -> Self
    where
        G: FnOnce(E) -> S + 'static,
        S: IntoResolution<T, E>,
    {
        let derived = Core::new(Rc::clone(self.core.scheduler()));
        let on_ok = Rc::clone(&derived);
        let on_err = Rc::clone(&derived);
        self.core.register_all([
            Reaction::fulfilled(move |value| {
                on_ok.fulfill(value);
            }),
            Reaction::rejected(move |reason| settle_with(&on_err, on_rejected(reason).into_resolution())),
        ]);
        Self { core: derived }
    }

    /// Runs `on_finally` after settlement, whatever the outcome.
    ///
    /// Returns this same promise, so the outcome downstream is unchanged.
    pub fn finally<F>(&self, on_finally: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        self.core.register(Reaction::finally(on_finally));
        self.clone()
    }

    /// Registers raw settlement callbacks without deriving a promise.
    pub(crate) fn on_settled<F, G>(&self, on_fulfilled: F, on_rejected: G)
    where
        F: FnOnce(T) + 'static,
        G: FnOnce(E) + 'static,
    {
        self.core
            .register_all([Reaction::fulfilled(on_fulfilled), Reaction::rejected(on_rejected)]);
    }

    /// Returns a snapshot of the current settlement.
    #[must_use]
    pub fn state(&self) -> PromiseState<T, E> {
        self.core.snapshot()
    }
}

impl<T, E> Promise<T, E> {
    /// Returns this promise's id.
    #[must_use]
    pub fn id(&self) -> PromiseId {
        self.core.id()
    }

    /// Returns the settlement status.
    #[must_use]
    pub fn status(&self) -> Status {
        self.core.status()
    }

    /// Returns true while unsettled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        !self.status().is_settled()
    }

    /// Returns the scheduler this promise dispatches on.
    #[must_use]
    pub fn scheduler(&self) -> &SchedulerRef {
        self.core.scheduler()
    }

    /// Returns the number of reactions waiting for the next flush.
    #[must_use]
    pub fn queued_reactions(&self) -> usize {
        self.core.queued()
    }

    /// Returns true if both handles refer to the same promise.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }
}

impl<T, E> Clone for Promise<T, E> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl<T, E> fmt::Debug for Promise<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("id", &self.id())
            .field("status", &self.status())
            .field("queued", &self.queued_reactions())
            .finish()
    }
}
