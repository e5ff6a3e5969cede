//! Statistics aggregation over worker outcomes.
//!
//! Latency statistics are computed over successful queries only, in
//! milliseconds. Samples are sorted before any arithmetic, so the result
//! depends only on the multiset of outcomes and never on arrival order.

use crate::model::Outcome;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::info;

/// Descriptive statistics over a set of latencies, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatencySummary {
    pub sum: f64,
    pub min: f64,
    pub mean: f64,
    /// Middle sample, or the mean of the two middle samples for an even count.
    pub median: f64,
    pub max: f64,
}

impl LatencySummary {
    /// Summarize `samples`. Returns `None` for an empty set.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let sum: f64 = sorted.iter().sum();
        let median = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        };

        Some(Self {
            sum,
            min: sorted[0],
            mean: sum / n as f64,
            median,
            max: sorted[n - 1],
        })
    }
}

/// Final counts and latency summary for a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateReport {
    pub total_count: u64,
    pub error_count: u64,
    /// `None` when no query succeeded.
    pub latency: Option<LatencySummary>,
}

impl AggregateReport {
    pub fn success_count(&self) -> u64 {
        self.total_count - self.error_count
    }
}

/// Running fold of outcomes into counts and latency samples.
#[derive(Debug, Default)]
pub struct StatsAccumulator {
    total: u64,
    errors: u64,
    samples_ms: Vec<f64>,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: Outcome) {
        self.total += 1;
        if outcome.succeeded {
            self.samples_ms.push(outcome.duration_ms());
        } else {
            self.errors += 1;
        }
    }

    pub fn finish(self) -> AggregateReport {
        AggregateReport {
            total_count: self.total,
            error_count: self.errors,
            latency: LatencySummary::from_samples(&self.samples_ms),
        }
    }
}

/// Consume outcomes until every sender is gone, then summarize.
pub async fn aggregate(mut outcomes: mpsc::Receiver<Outcome>) -> AggregateReport {
    let mut acc = StatsAccumulator::new();
    while let Some(outcome) = outcomes.recv().await {
        acc.record(outcome);
    }

    let report = acc.finish();
    info!(
        total = report.total_count,
        errors = report.error_count,
        "outcome channel closed, statistics final"
    );
    report
}
