//! Worker loop: drain a private queue, time each query, emit outcomes.

use crate::executor::QueryExecutor;
use crate::model::{Outcome, WorkItem};
use crate::telemetry::metrics;
use crate::telemetry::query::{record_query_result, start_query_span};
use opentelemetry::KeyValue;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{Instrument, error, info, warn};

/// What a worker did over the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerSummary {
    pub id: usize,
    pub processed: u64,
    pub failed: u64,
}

/// Run one worker until its queue is closed and empty.
///
/// A failed query becomes a failed [`Outcome`]; the worker keeps going.
pub async fn run_worker(
    id: usize,
    mut queue: mpsc::Receiver<WorkItem>,
    outcomes: mpsc::Sender<Outcome>,
    executor: Arc<dyn QueryExecutor>,
) -> WorkerSummary {
    info!(worker = id, "worker started");
    let queries = metrics::queries();
    let durations = metrics::query_duration_ms();
    let mut summary = WorkerSummary {
        id,
        ..WorkerSummary::default()
    };

    while let Some(item) = queue.recv().await {
        let span = start_query_span(id, &item);

        let start = Instant::now();
        let result = executor.execute(&item).instrument(span.clone()).await;
        let elapsed = start.elapsed();

        let outcome = match result {
            Ok(result) => {
                let outcome = Outcome::success(elapsed);
                let duration_ms = outcome.duration_ms();
                record_query_result(&span, result.rows, duration_ms);
                span.in_scope(|| {
                    info!(
                        worker = id,
                        line = item.source_line,
                        host = %item.host,
                        rows = result.rows,
                        duration_ms,
                        "query completed"
                    );
                });
                queries.add(1, &[KeyValue::new("result", "ok")]);
                durations.record(duration_ms, &[]);
                outcome
            }
            Err(e) => {
                span.in_scope(|| {
                    warn!(
                        worker = id,
                        line = item.source_line,
                        host = %item.host,
                        error = %e,
                        "query failed"
                    );
                });
                queries.add(1, &[KeyValue::new("result", "error")]);
                summary.failed += 1;
                Outcome::failure()
            }
        };
        summary.processed += 1;

        if outcomes.send(outcome).await.is_err() {
            error!(worker = id, "outcome channel closed, stopping worker");
            break;
        }
    }

    info!(
        worker = id,
        processed = summary.processed,
        failed = summary.failed,
        "worker finished"
    );
    summary
}
