//! Shape of a single benchmark run: pool size and channel capacities.

use crate::error::{Error, Result};
use std::time::Duration;

/// Run configuration for [`crate::engine::Benchmark`].
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Number of workers in the pool. Also bounds concurrent DB sessions.
    pub workers: usize,
    /// Capacity of the source → dispatcher queue.
    pub work_queue_capacity: usize,
    /// Capacity of each dispatcher → worker queue.
    pub worker_queue_capacity: usize,
    /// Capacity of the workers → aggregator queue.
    pub outcome_queue_capacity: usize,
    /// Abort the whole run if it has not finished after this long.
    pub deadline: Option<Duration>,
}

impl BenchConfig {
    /// Defaults derived from the worker count.
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            work_queue_capacity: workers.saturating_mul(2).max(1),
            worker_queue_capacity: 1,
            outcome_queue_capacity: 5,
            deadline: None,
        }
    }

    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Reject a pool that could never make progress.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::Config("worker count must be at least 1".to_string()));
        }
        for (name, capacity) in [
            ("work queue", self.work_queue_capacity),
            ("worker queue", self.worker_queue_capacity),
            ("outcome queue", self.outcome_queue_capacity),
        ] {
            if capacity == 0 {
                return Err(Error::Config(format!("{name} capacity must be at least 1")));
            }
        }
        Ok(())
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self::new(1)
    }
}
