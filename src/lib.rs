//! Pledge: single-threaded promises with deferred, ordered dispatch.
//!
//! # Overview
//!
//! A [`Promise`] stands for a value that is not known yet. It settles exactly
//! once, to a value or to a rejection reason, and consumers react to that
//! settlement through chained handlers. Handlers never run inside the call
//! that registers them: every dispatch goes through a [`Scheduler`], so the
//! order in which reactions run is decided by registration order and the
//! scheduler's queue, never by who happened to be on the stack.
//!
//! # Core Guarantees
//!
//! - **Write-once settlement**: later resolve/reject calls are ignored
//! - **Deferred dispatch**: reactions run from a scheduler job, never inline
//! - **Registration order**: reactions of one promise run in the order they were added
//! - **Flattening**: a handler returning a promise or [`Thenable`] makes the derived promise follow it
//! - **Rejection propagation**: a rejection passes through `then` until a handler takes it
//!
//! # Module Structure
//!
//! - [`promise`]: The promise handle, resolvers and reaction dispatch
//! - [`combinator`]: `resolve`, `reject`, `all`, `race` and `delay`
//! - [`runtime`]: The [`Scheduler`] trait, [`EventLoop`] and [`Immediate`]
//! - [`types`]: Identifiers, ticks and state snapshots
//! - [`config`]: Event loop configuration
//! - [`error`](mod@error): Error types for the runtime and configuration layers
//! - [`tracing_compat`]: Optional tracing integration (requires `tracing-integration` feature)
//!
//! # Example
//!
//! ```
//! use pledge::combinator::{self, Operand};
//! use pledge::{EventLoop, Promise, PromiseState};
//!
//! let lp = EventLoop::new();
//! let sched = lp.handle();
//!
//! let (slow, resolver) = Promise::<u32, String>::pending(&sched);
//! let total = combinator::all(&sched, [Operand::from(&slow), Operand::value(2)])
//!     .then(|parts| Ok::<_, String>(parts.iter().sum::<u32>()));
//!
//! resolver.resolve(40);
//! lp.run_until_idle().unwrap();
//! assert_eq!(total.state(), PromiseState::Fulfilled(42));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_inception)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)]

pub mod combinator;
pub mod config;
pub mod error;
pub mod promise;
pub mod runtime;
pub mod tracing_compat;
pub mod types;

// ── Test-only modules ───────────────────────────────────────────────────
#[cfg(any(test, feature = "test-internals"))]
pub mod test_utils;

// Re-exports for convenient access to core types
pub use config::{LoopConfig, UnhandledRejectionPolicy};
pub use error::{ConfigError, Error, LoopError, Result};
pub use promise::{
    IntoResolution, Promise, Reject, Resolution, Resolve, Resolver, Settled, Thenable,
};
pub use runtime::{EventLoop, Immediate, Job, RunReport, Scheduler, SchedulerRef};
pub use types::{PromiseId, PromiseState, Status, Tick};
