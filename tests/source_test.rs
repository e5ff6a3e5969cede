//! Work item source: CSV parsing, header and bad-row handling.

use csv_async::ByteRecord;
use query_bench::error::Error;
use query_bench::model::{SourceSummary, WorkItem};
use query_bench::source::{RowError, open_input, parse_record, read_work_items};
use std::path::Path;
use tokio::sync::mpsc;

async fn read_all(input: &[u8]) -> (Vec<WorkItem>, SourceSummary) {
    let (tx, mut rx) = mpsc::channel(64);
    let summary = read_work_items(input, tx).await;
    let mut items = Vec::new();
    while let Some(item) = rx.recv().await {
        items.push(item);
    }
    (items, summary)
}

// ---------------------------------------------------------------------------
// Single records
// ---------------------------------------------------------------------------

#[test]
fn parses_a_plain_record() {
    let record = ByteRecord::from(vec![
        "host_000008",
        "2017-01-01 08:59:22",
        "2017-01-01 09:59:22",
    ]);
    assert_eq!(
        parse_record(&record, 2).unwrap(),
        WorkItem::new("host_000008", "2017-01-01 08:59:22", "2017-01-01 09:59:22", 2)
    );
}

#[test]
fn trims_field_whitespace() {
    let record = ByteRecord::from(vec![" host_1 ", " 2017-01-01 00:00:00", "2017-01-02 00:00:00 "]);
    let item = parse_record(&record, 5).unwrap();
    assert_eq!(item.host, "host_1");
    assert_eq!(item.range_start, "2017-01-01 00:00:00");
    assert_eq!(item.range_end, "2017-01-02 00:00:00");
}

#[test]
fn rejects_wrong_field_count() {
    let short = ByteRecord::from(vec!["host_1", "2017-01-01"]);
    let long = ByteRecord::from(vec!["a", "b", "c", "d"]);
    assert_eq!(parse_record(&short, 3), Err(RowError::FieldCount(2)));
    assert_eq!(parse_record(&long, 3), Err(RowError::FieldCount(4)));
}

#[test]
fn rejects_blank_host() {
    let record = ByteRecord::from(vec!["  ", "start", "end"]);
    assert_eq!(parse_record(&record, 3), Err(RowError::EmptyHost));
}

#[test]
fn rejects_invalid_utf8_field() {
    let mut record = ByteRecord::new();
    record.push_field(b"host_\xff");
    record.push_field(b"start");
    record.push_field(b"end");
    assert_eq!(parse_record(&record, 3), Err(RowError::InvalidUtf8(1)));
}

// ---------------------------------------------------------------------------
// Whole inputs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn skips_header_and_numbers_lines_physically() {
    let input = b"hostname,start_time,end_time\n\
                  host_1,s1,e1\n\
                  \n\
                  host_2,s2,e2\r\n\
                  broken row\n\
                  host_1,s3,e3";
    let (items, summary) = read_all(input).await;

    assert_eq!(summary.rows_read, 3);
    assert_eq!(summary.rows_skipped, 1);
    let lines: Vec<u64> = items.iter().map(|i| i.source_line).collect();
    assert_eq!(lines, vec![2, 4, 6]);
    assert_eq!(items[1].range_end, "e2");
}

#[tokio::test]
async fn invalid_utf8_row_is_skipped_and_reading_continues() {
    let input = b"hostname,start_time,end_time\n\
                  host_1,s,e\n\
                  host_\xff,s,e\n\
                  host_2,s,e\n\
                  host_3,s,e\n";
    let (items, summary) = read_all(input).await;

    assert_eq!(summary.rows_read, 3);
    assert_eq!(summary.rows_skipped, 1);
    let hosts: Vec<&str> = items.iter().map(|i| i.host.as_str()).collect();
    assert_eq!(hosts, vec!["host_1", "host_2", "host_3"]);
}

#[tokio::test]
async fn quoted_fields_follow_csv_rules() {
    let input = b"hostname,start_time,end_time\n\
                  \"host,1\",2017-01-01,2017-01-02\n\
                  \"ho\"\"st\",a,b\n\
                  \"multi\nline\",c,d\n\
                  host_4,e,f\n";
    let (items, summary) = read_all(input).await;

    assert_eq!(summary.rows_skipped, 0);
    assert_eq!(items.len(), 4);
    assert_eq!(items[0].host, "host,1");
    assert_eq!(items[0].range_end, "2017-01-02");
    assert_eq!(items[1].host, "ho\"st");
    assert_eq!(items[2].host, "multi\nline");
    // The quoted newline spans lines 4-5, so the next record starts on line 6.
    assert_eq!(items[3].source_line, 6);
}

#[tokio::test]
async fn header_only_input_yields_nothing() {
    let (items, summary) = read_all(b"hostname,start_time,end_time\n").await;
    assert!(items.is_empty());
    assert_eq!(summary.rows_read, 0);
    assert_eq!(summary.rows_skipped, 0);
}

#[tokio::test]
async fn stops_when_queue_is_closed() {
    let (tx, rx) = mpsc::channel(1);
    drop(rx);
    let input: &[u8] = b"h\nhost_1,s,e\nhost_2,s,e\n";
    let summary = read_work_items(input, tx).await;
    assert_eq!(summary.rows_read, 0);
}

#[tokio::test]
async fn missing_file_is_input_unavailable() {
    let result = open_input(Path::new("/nonexistent/query_params.csv")).await;
    assert!(matches!(result, Err(Error::InputUnavailable { .. })));
}
