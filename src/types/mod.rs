//! Core types shared by promises and the runtime.
//!
//! - [`id`]: Identifier and time types (`PromiseId`, `Tick`)
//! - [`state`]: Observable promise state snapshots

pub mod id;
pub mod state;

pub use id::{PromiseId, Tick};
pub use state::{PromiseState, Status};
