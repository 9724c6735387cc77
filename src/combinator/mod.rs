//! Combinators over promises.
//!
//! - [`resolve`] / [`reject`]: already-settled promises
//! - [`all`]: wait for every input, first rejection wins
//! - [`race`]: first input to settle wins
//! - [`delay`]: fulfill after a number of timer ticks
//!
//! [`all`] and [`race`] take [`Operand`]s, so plain values and promises can
//! be mixed in one input list.

pub mod all;
pub mod delay;
pub mod operand;
pub mod race;
pub mod ready;

pub use all::all;
pub use delay::delay;
pub use operand::Operand;
pub use race::race;
pub use ready::{reject, resolve};
