//! Settlement capabilities.
//!
//! Only holders of these capabilities can settle a promise. The first call
//! on any of them wins; later calls return `false` and change nothing.

use super::core::Core;
use crate::types::PromiseId;
use core::fmt;
use std::rc::Rc;

/// The capability to fulfill one promise.
pub struct Resolve<T, E> {
    core: Rc<Core<T, E>>,
}

/// The capability to reject one promise.
pub struct Reject<T, E> {
    core: Rc<Core<T, E>>,
}

/// Both settlement capabilities for one promise.
pub struct Resolver<T, E> {
    resolve: Resolve<T, E>,
    reject: Reject<T, E>,
}

impl<T, E> Resolve<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    pub(crate) const fn new(core: Rc<Core<T, E>>) -> Self {
        Self { core }
    }

    /// Fulfills the promise. Returns false if it was already settled.
    pub fn resolve(&self, value: T) -> bool {
        self.core.fulfill(value)
    }
}

impl<T, E> Reject<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    pub(crate) const fn new(core: Rc<Core<T, E>>) -> Self {
        Self { core }
    }

    /// Rejects the promise. Returns false if it was already settled.
    pub fn reject(&self, reason: E) -> bool {
        self.core.reject(reason)
    }
}

impl<T, E> Resolver<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    pub(crate) fn new(core: &Rc<Core<T, E>>) -> Self {
        Self {
            resolve: Resolve::new(Rc::clone(core)),
            reject: Reject::new(Rc::clone(core)),
        }
    }

    /// Fulfills the promise. Returns false if it was already settled.
    pub fn resolve(&self, value: T) -> bool {
        self.resolve.resolve(value)
    }

    /// Rejects the promise. Returns false if it was already settled.
    pub fn reject(&self, reason: E) -> bool {
        self.reject.reject(reason)
    }

    /// Settles from a `Result`. Returns false if it was already settled.
    pub fn settle(&self, outcome: Result<T, E>) -> bool {
        match outcome {
            Ok(value) => self.resolve(value),
            Err(reason) => self.reject(reason),
        }
    }

    /// Splits into the two capabilities.
    #[must_use]
    pub fn split(self) -> (Resolve<T, E>, Reject<T, E>) {
        (self.resolve, self.reject)
    }
}

impl<T, E> Resolve<T, E> {
    /// Returns the id of the promise this capability settles.
    #[must_use]
    pub fn promise_id(&self) -> PromiseId {
        self.core.id()
    }

    /// Returns true once the promise settled, by any path.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.core.status().is_settled()
    }
}

impl<T, E> Reject<T, E> {
    /// Returns the id of the promise this capability settles.
    #[must_use]
    pub fn promise_id(&self) -> PromiseId {
        self.core.id()
    }

    /// Returns true once the promise settled, by any path.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.core.status().is_settled()
    }
}

impl<T, E> Resolver<T, E> {
    /// Returns the id of the promise this resolver settles.
    #[must_use]
    pub fn promise_id(&self) -> PromiseId {
        self.resolve.promise_id()
    }

    /// Returns true once the promise settled, by any path.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.resolve.is_settled()
    }
}

impl<T, E> Clone for Resolve<T, E> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl<T, E> Clone for Reject<T, E> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl<T, E> Clone for Resolver<T, E> {
    fn clone(&self) -> Self {
        Self {
            resolve: self.resolve.clone(),
            reject: self.reject.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Resolve<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Resolve").field(&self.core.id()).finish()
    }
}

impl<T, E> fmt::Debug for Reject<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Reject").field(&self.core.id()).finish()
    }
}

impl<T, E> fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("promise", &self.promise_id())
            .field("settled", &self.is_settled())
            .finish()
    }
}
