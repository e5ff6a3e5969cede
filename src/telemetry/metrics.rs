//! Metric instrument factories for query-bench.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! Without an OTLP endpoint the global provider is a no-op.

use opentelemetry::metrics::{Counter, Histogram, Meter};

fn meter() -> Meter {
    opentelemetry::global::meter("query-bench")
}

/// Counter: queries executed by workers.
/// Labels: `result` ("ok" | "error").
pub fn queries() -> Counter<u64> {
    meter()
        .u64_counter("query_bench.queries")
        .with_description("Number of queries executed")
        .build()
}

/// Histogram: executor call duration in milliseconds.
pub fn query_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("query_bench.query.duration_ms")
        .with_description("Query execution time in milliseconds")
        .with_unit("ms")
        .build()
}

/// Counter: malformed input rows dropped by the source.
pub fn input_rows_skipped() -> Counter<u64> {
    meter()
        .u64_counter("query_bench.input.rows_skipped")
        .with_description("Malformed input rows skipped")
        .build()
}

/// Counter: work items routed by the dispatcher.
/// Labels: `worker`.
pub fn dispatched_items() -> Counter<u64> {
    meter()
        .u64_counter("query_bench.dispatch.items")
        .with_description("Work items routed to each worker")
        .build()
}
