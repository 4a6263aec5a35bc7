//! Cooperative poll-loop scheduler
//!
//! The firmware runs a single non-blocking loop that invokes every
//! component's `poll()` once per iteration; there is no preemption and no
//! second execution context. This module adds per-task diagnostics on top of
//! that loop: run counts and worst-case execution time, measured against the
//! monotonic clock.
//!
//! Network operations inside a poll are synchronous and stall the whole loop
//! for their duration; the stats below are how that shows up in practice.

use heapless::Vec;

use crate::platform::traits::ClockInterface;

/// Maximum number of registered tasks
pub const MAX_TASKS: usize = 8;

/// Per-task execution statistics
#[derive(Debug, Clone, Copy)]
pub struct TaskStats {
    /// Task name for diagnostics output
    pub name: &'static str,
    /// Completed invocations
    pub runs: u32,
    /// Duration of the most recent invocation in ms
    pub last_ms: u32,
    /// Worst observed invocation duration in ms
    pub max_ms: u32,
}

impl TaskStats {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            runs: 0,
            last_ms: 0,
            max_ms: 0,
        }
    }
}

/// Poll-loop scheduler with execution statistics
pub struct Scheduler {
    tasks: Vec<TaskStats, MAX_TASKS>,
}

impl Scheduler {
    /// Create an empty scheduler
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Register a task; returns its id for [`Scheduler::run`]
    pub fn register(&mut self, name: &'static str) -> usize {
        let id = self.tasks.len();
        let _ = self.tasks.push(TaskStats::new(name));
        id
    }

    /// Run one task invocation, measuring its duration
    pub fn run<C, F, R>(&mut self, id: usize, clock: &C, f: F) -> R
    where
        C: ClockInterface,
        F: FnOnce() -> R,
    {
        let start = clock.now_ms();
        let result = f();
        let duration = clock.now_ms().wrapping_sub(start);

        if let Some(stats) = self.tasks.get_mut(id) {
            stats.runs = stats.runs.wrapping_add(1);
            stats.last_ms = duration;
            if duration > stats.max_ms {
                stats.max_ms = duration;
            }
        }
        result
    }

    /// Statistics for one task
    pub fn stats(&self, id: usize) -> Option<&TaskStats> {
        self.tasks.get(id)
    }

    /// Statistics for all registered tasks
    pub fn iter(&self) -> impl Iterator<Item = &TaskStats> {
        self.tasks.iter()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
