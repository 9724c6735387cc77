//! Deferred dispatch for promises.
//!
//! - [`Scheduler`]: the capability promises dispatch their flushes on
//! - [`Job`]: a boxed one-shot unit of deferred work
//! - [`EventLoop`]: FIFO reference scheduler with virtual time
//! - [`Immediate`]: synchronous scheduler (no deferral)
//! - [`TimerHeap`]: deadline-ordered job storage used by the loop

pub mod event_loop;
pub mod job;
pub mod scheduler;
pub mod timer;

pub use event_loop::{EventLoop, RunReport};
pub use job::Job;
pub use scheduler::{Immediate, Scheduler, SchedulerRef};
pub use timer::TimerHeap;
