//! Inputs accepted by the collection combinators.

use crate::promise::Promise;

/// One input to [`all`](super::all) or [`race`](super::race).
///
/// A plain value counts as already fulfilled and is observed synchronously
/// while the combinator iterates its inputs.
#[derive(Debug, Clone)]
pub enum Operand<T, E> {
    /// A value that is already available.
    Value(T),
    /// A promise whose settlement is awaited.
    Promise(Promise<T, E>),
}

impl<T, E> Operand<T, E> {
    /// Wraps a plain value.
    pub const fn value(value: T) -> Self {
        Self::Value(value)
    }

    /// Returns true for the plain-value variant.
    #[must_use]
    pub const fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

impl<T, E> Operand<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Hands the outcome to exactly one callback. Plain values call
    /// `on_fulfilled` right away; promises go through a deferred flush.
    pub(crate) fn observe<F, G>(self, on_fulfilled: F, on_rejected: G)
    where
        F: FnOnce(T) + 'static,
        G: FnOnce(E) + 'static,
    {
        match self {
            Self::Value(value) => on_fulfilled(value),
            Self::Promise(promise) => promise.on_settled(on_fulfilled, on_rejected),
        }
    }
}

impl<T, E> From<Promise<T, E>> for Operand<T, E> {
    fn from(promise: Promise<T, E>) -> Self {
        Self::Promise(promise)
    }
}

impl<T, E> From<&Promise<T, E>> for Operand<T, E> {
    fn from(promise: &Promise<T, E>) -> Self {
        Self::Promise(promise.clone())
    }
}
