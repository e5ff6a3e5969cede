//! Core data model.
//!
//! A work item is one query to replay: a host, a time range, and the input
//! line it came from. Each work item yields exactly one outcome.

use serde::Serialize;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Work Item
// ---------------------------------------------------------------------------

/// A single query to run, as read from the params file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Routing key. Items with the same host always land on the same worker.
    pub host: String,

    /// Start of the queried time range. Passed to the executor as-is.
    pub range_start: String,

    /// End of the queried time range. Passed to the executor as-is.
    pub range_end: String,

    /// Physical line number in the input. Diagnostics only.
    pub source_line: u64,
}

impl WorkItem {
    pub fn new(
        host: impl Into<String>,
        range_start: impl Into<String>,
        range_end: impl Into<String>,
        source_line: u64,
    ) -> Self {
        Self {
            host: host.into(),
            range_start: range_start.into(),
            range_end: range_end.into(),
            source_line,
        }
    }

    /// The key the dispatcher hashes.
    pub fn routing_key(&self) -> &str {
        &self.host
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of running one work item, sent from a worker to the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub succeeded: bool,
    /// Wall-clock time of the executor call. Zero for failures.
    pub duration_nanos: u64,
}

impl Outcome {
    pub fn success(elapsed: Duration) -> Self {
        Self {
            succeeded: true,
            duration_nanos: u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX),
        }
    }

    pub fn failure() -> Self {
        Self {
            succeeded: false,
            duration_nanos: 0,
        }
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_nanos as f64 / 1e6
    }
}

/// What the executor reports back for a successful query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryResult {
    pub rows: u64,
}

// ---------------------------------------------------------------------------
// Source summary
// ---------------------------------------------------------------------------

/// Counters produced by the work item source once input is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SourceSummary {
    /// Data rows turned into work items (header excluded).
    pub rows_read: u64,
    /// Malformed rows that were logged and dropped.
    pub rows_skipped: u64,
}
