//! Reaction records queued on a promise.

use core::fmt;

/// The kind of a queued reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionKind {
    /// Runs with the value when the promise fulfills.
    OnFulfilled,
    /// Runs with the reason when the promise rejects.
    OnRejected,
    /// Runs with no argument on either outcome.
    OnFinally,
}

/// A one-shot handler waiting for settlement.
pub(crate) enum Reaction<T, E> {
    OnFulfilled(Box<dyn FnOnce(T)>),
    OnRejected {
        handler: Box<dyn FnOnce(E)>,
        // False for the pass-through `then` installs when no rejection
        // handler was given.
        supplied: bool,
    },
    OnFinally(Box<dyn FnOnce()>),
}

impl<T, E> Reaction<T, E> {
    pub(crate) fn fulfilled(handler: impl FnOnce(T) + 'static) -> Self {
        Self::OnFulfilled(Box::new(handler))
    }

    pub(crate) fn rejected(handler: impl FnOnce(E) + 'static) -> Self {
        Self::OnRejected {
            handler: Box::new(handler),
            supplied: true,
        }
    }

    pub(crate) fn pass_rejection(handler: impl FnOnce(E) + 'static) -> Self {
        Self::OnRejected {
            handler: Box::new(handler),
            supplied: false,
        }
    }

    pub(crate) fn finally(handler: impl FnOnce() + 'static) -> Self {
        Self::OnFinally(Box::new(handler))
    }

    pub(crate) const fn kind(&self) -> ReactionKind {
        match self {
            Self::OnFulfilled(_) => ReactionKind::OnFulfilled,
            Self::OnRejected { .. } => ReactionKind::OnRejected,
            Self::OnFinally(_) => ReactionKind::OnFinally,
        }
    }
}

impl<T, E> fmt::Debug for Reaction<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnRejected { supplied, .. } => f
                .debug_struct("OnRejected")
                .field("supplied", supplied)
                .finish_non_exhaustive(),
            other => write!(f, "{:?}", other.kind()),
        }
    }
}
