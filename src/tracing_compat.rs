//! Optional tracing integration.
//!
//! With the `tracing-integration` feature enabled this module re-exports the
//! `tracing` event macros. Without it, the same names resolve to macros that
//! expand to nothing, so call sites never need their own `cfg` guards.
//!
//! ```ignore
//! use crate::tracing_compat::{debug, warn};
//!
//! debug!(promise = %id, "late settlement ignored");
//! ```

#[cfg(feature = "tracing-integration")]
pub use tracing::{debug, error, info, trace, warn};

#[cfg(not(feature = "tracing-integration"))]
mod noop {
    #[doc(hidden)]
    #[macro_export]
    macro_rules! __pledge_noop_event {
        ($($arg:tt)*) => {{}};
    }
}

#[cfg(not(feature = "tracing-integration"))]
pub use crate::__pledge_noop_event as debug;
#[cfg(not(feature = "tracing-integration"))]
pub use crate::__pledge_noop_event as error;
#[cfg(not(feature = "tracing-integration"))]
pub use crate::__pledge_noop_event as info;
#[cfg(not(feature = "tracing-integration"))]
pub use crate::__pledge_noop_event as trace;
#[cfg(not(feature = "tracing-integration"))]
pub use crate::__pledge_noop_event as warn;

/// Returns true when events are forwarded to `tracing`.
#[must_use]
pub const fn enabled() -> bool {
    cfg!(feature = "tracing-integration")
}
