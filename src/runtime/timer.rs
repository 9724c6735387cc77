//! Timer heap for tick-delayed jobs.
//!
//! A min-heap of `(deadline, generation, job)` entries. Jobs sharing a
//! deadline come out in insertion order.

use super::Job;
use crate::types::Tick;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
struct TimerEntry {
    deadline: Tick,
    generation: u64,
    job: Job,
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.generation == other.generation
    }
}

impl Eq for TimerEntry {}

impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (earliest deadline first).
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.generation.cmp(&self.generation))
    }
}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A min-heap of jobs ordered by deadline.
#[derive(Debug, Default)]
pub struct TimerHeap {
    heap: BinaryHeap<TimerEntry>,
    next_generation: u64,
}

impl TimerHeap {
    /// Creates a new empty timer heap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of armed timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if no timer is armed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Arms a job for the given deadline.
    pub fn insert(&mut self, deadline: Tick, job: Job) {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.heap.push(TimerEntry {
            deadline,
            generation,
            job,
        });
    }

    /// Returns the earliest deadline, if any.
    #[must_use]
    pub fn peek_deadline(&self) -> Option<Tick> {
        self.heap.peek().map(|e| e.deadline)
    }

    /// Pops all jobs whose deadline is `<= now`, earliest first.
    pub fn pop_expired(&mut self, now: Tick) -> Vec<Job> {
        let mut expired = Vec::new();
        while self.heap.peek().is_some_and(|entry| entry.deadline <= now) {
            if let Some(entry) = self.heap.pop() {
                expired.push(entry.job);
            }
        }
        expired
    }

    /// Drops all armed jobs.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
