//! Final run report, rendered for operators or as JSON.

use crate::engine::stats::AggregateReport;
use crate::model::SourceSummary;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Everything printed at the end of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub workers: usize,
    pub started_at: DateTime<Utc>,
    pub wall_time_ms: f64,
    pub source: SourceSummary,
    pub stats: AggregateReport,
}

impl RunReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn millis(value: Option<f64>) -> String {
    match value {
        Some(ms) => format!("{ms:.6}ms"),
        None => "n/a".to_string(),
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let latency = self.stats.latency;

        writeln!(f, "Statistics")?;
        writeln!(f, "============")?;
        writeln!(f, "Workers: {}", self.workers)?;
        writeln!(f, "Total queries: {}", self.stats.total_count)?;
        writeln!(f, "Errors: {}", self.stats.error_count)?;
        writeln!(f, "Skipped input rows: {}", self.source.rows_skipped)?;
        writeln!(f, "Total time: {}", millis(latency.map(|l| l.sum)))?;
        writeln!(f, "Minimum query time: {}", millis(latency.map(|l| l.min)))?;
        writeln!(f, "Mean: {}", millis(latency.map(|l| l.mean)))?;
        writeln!(f, "Median: {}", millis(latency.map(|l| l.median)))?;
        writeln!(f, "Maximum query time: {}", millis(latency.map(|l| l.max)))?;
        writeln!(f, "Wall time: {:.3}ms", self.wall_time_ms)
    }
}
