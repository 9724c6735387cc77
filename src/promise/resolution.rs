//! What a reaction handler hands back, and how it settles the derived promise.
//!
//! A handler passed to `then`, `then_or` or `catch` returns anything that
//! implements [`IntoResolution`]:
//!
//! - `Ok(value)` fulfills the derived promise
//! - `Err(reason)` rejects it (a failing handler never turns into success)
//! - a [`Promise`] or any other [`Thenable`] makes the derived promise
//!   follow that thenable's settlement

use super::Promise;
use super::core::Core;
use core::fmt;
use std::rc::Rc;

/// Anything that can report its eventual settlement to a pair of callbacks.
///
/// This is the only capability chaining needs to flatten a nested
/// deferred value, so foreign promise-like types can take part by
/// implementing it.
pub trait Thenable<T, E> {
    /// Arranges for exactly one of the callbacks to run once settled.
    fn subscribe(self: Box<Self>, on_fulfilled: Box<dyn FnOnce(T)>, on_rejected: Box<dyn FnOnce(E)>);
}

/// The outcome a handler chose for the derived promise.
pub enum Resolution<T, E> {
    /// Fulfill with a value.
    Fulfill(T),
    /// Reject with a reason.
    Reject(E),
    /// Follow another thenable's settlement.
    Adopt(Box<dyn Thenable<T, E>>),
}

impl<T, E> Resolution<T, E> {
    /// Wraps a thenable for adoption.
    pub fn adopt(thenable: impl Thenable<T, E> + 'static) -> Self {
        Self::Adopt(Box::new(thenable))
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for Resolution<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fulfill(value) => f.debug_tuple("Fulfill").field(value).finish(),
            Self::Reject(reason) => f.debug_tuple("Reject").field(reason).finish(),
            Self::Adopt(_) => f.write_str("Adopt(..)"),
        }
    }
}

/// Conversion from a handler's return value into a [`Resolution`].
pub trait IntoResolution<T, E> {
    /// Performs the conversion.
    fn into_resolution(self) -> Resolution<T, E>;
}

impl<T, E> IntoResolution<T, E> for Resolution<T, E> {
    fn into_resolution(self) -> Resolution<T, E> {
        self
    }
}

impl<T, E> IntoResolution<T, E> for Result<T, E> {
    fn into_resolution(self) -> Resolution<T, E> {
        match self {
            Ok(value) => Resolution::Fulfill(value),
            Err(reason) => Resolution::Reject(reason),
        }
    }
}

impl<T, E> IntoResolution<T, E> for Promise<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    fn into_resolution(self) -> Resolution<T, E> {
        Resolution::adopt(self)
    }
}

impl<T, E> IntoResolution<T, E> for Box<dyn Thenable<T, E>> {
    fn into_resolution(self) -> Resolution<T, E> {
        Resolution::Adopt(self)
    }
}

impl<T, E> Thenable<T, E> for Promise<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    fn subscribe(self: Box<Self>, on_fulfilled: Box<dyn FnOnce(T)>, on_rejected: Box<dyn FnOnce(E)>) {
        self.on_settled(on_fulfilled, on_rejected);
    }
}

/// Settles `target` according to `resolution`.
pub(crate) fn settle_with<T, E>(target: &Rc<Core<T, E>>, resolution: Resolution<T, E>)
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    match resolution {
        Resolution::Fulfill(value) => {
            target.fulfill(value);
        }
        Resolution::Reject(reason) => {
            target.reject(reason);
        }
        Resolution::Adopt(thenable) => {
            let on_ok = Rc::clone(target);
            let on_err = Rc::clone(target);
            thenable.subscribe(
                Box::new(move |value| {
                    on_ok.fulfill(value);
                }),
                Box::new(move |reason| {
                    on_err.reject(reason);
                }),
            );
        }
    }
}
