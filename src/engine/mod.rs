//! Benchmark engine: dispatcher, workers, statistics, and run control.

pub mod control;
pub mod dispatch;
pub mod stats;
pub mod worker;

pub use control::Benchmark;
pub use dispatch::{dispatch, fnv1a_32, worker_index};
pub use stats::{AggregateReport, LatencySummary, StatsAccumulator, aggregate};
pub use worker::{WorkerSummary, run_worker};
