//! Query execution span helpers.

use crate::model::WorkItem;
use tracing::Span;

/// Start a span for one executor call.
///
/// `query.rows` and `query.duration_ms` are declared empty and filled in
/// by [`record_query_result`].
pub fn start_query_span(worker_id: usize, item: &WorkItem) -> Span {
    tracing::info_span!(
        "query.execute",
        "worker.id" = worker_id,
        "query.line" = item.source_line,
        "query.host" = %item.host,
        "query.rows" = tracing::field::Empty,
        "query.duration_ms" = tracing::field::Empty,
    )
}

/// Record a successful query's row count and latency on its span.
pub fn record_query_result(span: &Span, rows: u64, duration_ms: f64) {
    span.record("query.rows", rows);
    span.record("query.duration_ms", duration_ms);
}
