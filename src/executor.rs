//! The seam between workers and the database.
//!
//! Workers only see [`QueryExecutor`]; timing is done by the worker around
//! the call, so implementations just run the query and report rows.

use crate::error::Result;
use crate::model::{QueryResult, WorkItem};
use async_trait::async_trait;

/// Runs the benchmark query for a single work item.
///
/// Shared by all workers, so implementations must be safe for concurrent
/// calls. Any error is counted as a failed query; it never stops a worker.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, item: &WorkItem) -> Result<QueryResult>;
}
