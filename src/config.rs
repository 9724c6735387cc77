//! Event loop configuration.
//!
//! [`LoopConfig`] is plain data with builder-style setters. With the
//! `config-file` feature it can also be read from TOML:
//!
//! ```ignore
//! use pledge::config::LoopConfig;
//!
//! let config = LoopConfig::from_toml_str(r#"
//!     max_jobs_per_run = 10000
//!     unhandled_rejections = "count"
//! "#)?;
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// What the event loop does when a rejected promise flushes with no
/// rejection reaction attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnhandledRejectionPolicy {
    /// Do nothing.
    Ignore,
    /// Count and log a warning.
    #[default]
    Warn,
    /// Count without logging.
    Count,
}

impl UnhandledRejectionPolicy {
    /// Returns true if occurrences are counted in the run report.
    #[must_use]
    pub const fn counts(self) -> bool {
        !matches!(self, Self::Ignore)
    }

    /// Returns true if occurrences are logged.
    #[must_use]
    pub const fn logs(self) -> bool {
        matches!(self, Self::Warn)
    }
}

/// Configuration for [`EventLoop`](crate::runtime::EventLoop).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoopConfig {
    /// Maximum number of jobs one `run_until_idle` call may execute.
    /// `None` runs until the queue and timers are empty.
    pub max_jobs_per_run: Option<usize>,
    /// Handling of rejections nobody subscribed to.
    pub unhandled_rejections: UnhandledRejectionPolicy,
}

impl LoopConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-run job budget.
    #[must_use]
    pub const fn max_jobs_per_run(mut self, budget: usize) -> Self {
        self.max_jobs_per_run = Some(budget);
        self
    }

    /// Removes the per-run job budget.
    #[must_use]
    pub const fn unbounded(mut self) -> Self {
        self.max_jobs_per_run = None;
        self
    }

    /// Sets the unhandled rejection policy.
    #[must_use]
    pub const fn unhandled_rejections(mut self, policy: UnhandledRejectionPolicy) -> Self {
        self.unhandled_rejections = policy;
        self
    }

    /// Checks field ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_jobs_per_run == Some(0) {
            return Err(ConfigError::Invalid(
                "max_jobs_per_run must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Parses and validates a TOML document.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
