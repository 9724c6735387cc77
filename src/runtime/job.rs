//! Job type for deferred work.
//!
//! A `Job` wraps a type-erased one-shot closure handed to a
//! [`Scheduler`](super::Scheduler). Jobs are `!Send`: they capture promise
//! state that lives on a single thread.

/// A unit of deferred work.
pub struct Job {
    label: &'static str,
    run: Box<dyn FnOnce() + 'static>,
}

impl Job {
    /// Creates a job from a closure.
    pub fn new<F>(run: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self::labeled("job", run)
    }

    /// Creates a job carrying a static label for diagnostics.
    pub fn labeled<F>(label: &'static str, run: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            label,
            run: Box::new(run),
        }
    }

    /// Returns the diagnostic label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Runs the job, consuming it.
    pub fn run(self) {
        (self.run)();
    }
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
