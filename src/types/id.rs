//! Identifier types for promises and virtual time.
//!
//! Promise ids come from a process-wide counter; they exist for logs and
//! diagnostics only and carry no ownership meaning.

use core::fmt;
use serde::{Deserialize, Serialize};
use std::ops::Add;
use std::sync::atomic::{AtomicU64, Ordering};

static PROMISE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// A unique identifier for a promise.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromiseId(u64);

impl PromiseId {
    /// Allocates the next identifier.
    #[must_use]
    pub fn next() -> Self {
        Self(PROMISE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Creates a promise ID for testing purposes.
    #[doc(hidden)]
    #[must_use]
    pub const fn new_for_test(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric value.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for PromiseId {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PromiseId({})", self.0)
    }
}

impl fmt::Display for PromiseId {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// A point on the event loop's virtual clock.
///
/// The clock starts at [`Tick::ZERO`] and only moves forward when the ready
/// queue is empty and a timer is due.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Tick(u64);

impl Tick {
    /// The start of virtual time.
    pub const ZERO: Self = Self(0);

    /// Creates a tick from a raw count.
    #[inline]
    #[must_use]
    pub const fn new(ticks: u64) -> Self {
        Self(ticks)
    }

    /// Returns the raw tick count.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the number of ticks between `earlier` and `self`, saturating at zero.
    #[inline]
    #[must_use]
    pub const fn since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl Add<u64> for Tick {
    type Output = Self;

    #[inline]
    fn add(self, rhs: u64) -> Self::Output {
        Self(self.0.saturating_add(rhs))
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}
