//! Observable promise state.
//!
//! [`PromiseState`] is a cloned snapshot of a promise's settlement, handed
//! out by `Promise::state`. It is never used to drive the state machine.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Settlement status without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Not yet settled.
    Pending,
    /// Settled with a value.
    Fulfilled,
    /// Settled with a reason.
    Rejected,
}

impl Status {
    /// Returns true once the status can no longer change.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns the status name as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fulfilled => "fulfilled",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A snapshot of a promise's settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "payload", rename_all = "snake_case")]
pub enum PromiseState<T, E> {
    /// Not yet settled.
    Pending,
    /// Settled with a value.
    Fulfilled(T),
    /// Settled with a reason.
    Rejected(E),
}

impl<T, E> PromiseState<T, E> {
    /// Returns the payload-free status.
    #[must_use]
    pub const fn status(&self) -> Status {
        match self {
            Self::Pending => Status::Pending,
            Self::Fulfilled(_) => Status::Fulfilled,
            Self::Rejected(_) => Status::Rejected,
        }
    }

    /// Returns true while the promise is unsettled.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Converts a settled snapshot into a `Result`, or `None` while pending.
    #[must_use]
    pub fn into_result(self) -> Option<Result<T, E>> {
        match self {
            Self::Pending => None,
            Self::Fulfilled(value) => Some(Ok(value)),
            Self::Rejected(reason) => Some(Err(reason)),
        }
    }

    /// Returns the fulfilled value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Fulfilled(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the rejection reason, if any.
    #[must_use]
    pub const fn reason(&self) -> Option<&E> {
        match self {
            Self::Rejected(reason) => Some(reason),
            _ => None,
        }
    }
}
