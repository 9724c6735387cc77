//! Helpers for unit and integration tests.
//!
//! Compiled for `cfg(test)` and for the `test-internals` feature.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

static INIT_LOGGING: Once = Once::new();

/// Installs a `tracing` fmt subscriber filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pledge=trace"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Emits a phase marker into the test log.
pub fn phase(name: &str) {
    tracing::info!(phase = name, "test phase");
}

/// Marks the start of a named test phase in the log.
#[macro_export]
macro_rules! test_phase {
    ($name:expr) => {
        $crate::test_utils::phase($name)
    };
}

/// An ordered, shareable log of observations.
///
/// Clones share the same storage, so a recorder can be moved into many
/// reaction closures and inspected afterwards.
#[derive(Debug)]
pub struct Recorder<T> {
    entries: Rc<RefCell<Vec<T>>>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Rc::clone(&self.entries),
        }
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Recorder<T> {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Appends an observation.
    pub fn push(&self, entry: T) {
        self.entries.borrow_mut().push(entry);
    }

    /// Returns the number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Removes and returns every observation.
    #[must_use]
    pub fn take(&self) -> Vec<T> {
        std::mem::take(&mut *self.entries.borrow_mut())
    }
}

impl<T: Clone> Recorder<T> {
    /// Returns a copy of the observations.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.entries.borrow().clone()
    }
}
