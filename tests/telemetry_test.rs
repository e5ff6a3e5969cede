//! Integration tests for telemetry initialization and span helpers.

use query_bench::model::WorkItem;
use query_bench::report::RunReport;

#[test]
fn telemetry_initializes_without_endpoint() {
    // The global subscriber can only be set once per process, so this may
    // return Err if another test already installed one; that is acceptable.
    let config = query_bench::telemetry::TelemetryConfig {
        service_name: "query-bench-test".to_string(),
        ..Default::default()
    };
    let _guard = query_bench::telemetry::init_telemetry(config);
}

#[test]
fn query_span_creates_and_records_result() {
    let item = WorkItem::new("host_000001", "start", "end", 2);
    let span = query_bench::telemetry::query::start_query_span(1, &item);
    query_bench::telemetry::query::record_query_result(&span, 60, 12.5);
}

#[test]
fn metric_instruments_build_without_provider() {
    query_bench::telemetry::metrics::queries().add(1, &[]);
    query_bench::telemetry::metrics::query_duration_ms().record(1.0, &[]);
    query_bench::telemetry::metrics::input_rows_skipped().add(1, &[]);
    query_bench::telemetry::metrics::dispatched_items().add(1, &[]);
}

#[test]
fn report_serializes_to_json() {
    let report = RunReport {
        run_id: uuid::Uuid::nil(),
        workers: 2,
        started_at: chrono::Utc::now(),
        wall_time_ms: 5.0,
        source: Default::default(),
        stats: query_bench::engine::StatsAccumulator::new().finish(),
    };
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["workers"], 2);
    assert!(json["stats"]["latency"].is_null());
}
