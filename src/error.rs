//! Error types for the runtime and configuration layers.
//!
//! Promise operations themselves never fail: every failure of user work is
//! carried as a rejection reason. The types here cover the surrounding
//! machinery only.

use thiserror::Error;

/// Errors reported by [`EventLoop`](crate::runtime::EventLoop).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoopError {
    /// `run_until_idle` stopped with work still queued.
    #[error("event loop budget exhausted after {executed} jobs (budget {budget}, {remaining} still queued)")]
    BudgetExhausted {
        /// Jobs executed during the run.
        executed: usize,
        /// Configured job budget.
        budget: usize,
        /// Ready jobs plus armed timers left behind.
        remaining: usize,
    },
    /// `block_on` ran out of jobs and timers while the future was pending.
    #[error("event loop stalled after {executed} jobs with the awaited future still pending")]
    Stalled {
        /// Jobs executed before the loop ran dry.
        executed: usize,
    },
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The configuration text could not be parsed.
    #[error("config parse error: {0}")]
    Parse(String),
    /// A field holds a value outside its allowed range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Umbrella error for the crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Event loop failure.
    #[error(transparent)]
    Loop(#[from] LoopError),
    /// Configuration failure.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias using the crate error.
pub type Result<T> = std::result::Result<T, Error>;
