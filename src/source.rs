//! Work item source: reads the query params CSV and feeds the work queue.
//!
//! Expected layout is a header record followed by `hostname,start_time,end_time`
//! records in RFC 4180 CSV. Bad rows are logged and skipped; only a missing
//! input is fatal.

use crate::error::{Error, Result};
use crate::model::{SourceSummary, WorkItem};
use crate::telemetry::metrics;
use csv_async::{AsyncReaderBuilder, ByteRecord};
use std::path::Path;
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const FIELDS_PER_ROW: usize = 3;

/// Raw input handed to [`read_work_items`]. The CSV reader does its own buffering.
pub type Input = Box<dyn AsyncRead + Send + Unpin>;

/// Why a data row was rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RowError {
    #[error("expected 3 fields, found {0}")]
    FieldCount(usize),

    #[error("empty hostname")]
    EmptyHost,

    #[error("field {0} is not valid UTF-8")]
    InvalidUtf8(usize),
}

/// Open the params input. `-` means standard input.
///
/// # Errors
///
/// Returns [`Error::InputUnavailable`] if the file cannot be opened.
pub async fn open_input(path: &Path) -> Result<Input> {
    if path == Path::new("-") {
        debug!("reading params from stdin");
        return Ok(Box::new(tokio::io::stdin()));
    }

    let file = tokio::fs::File::open(path)
        .await
        .map_err(|source| Error::InputUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Box::new(file))
}

/// Turn one CSV record into a work item.
///
/// Fields are decoded individually so a bad byte only costs its own row.
pub fn parse_record(
    record: &ByteRecord,
    source_line: u64,
) -> std::result::Result<WorkItem, RowError> {
    if record.len() != FIELDS_PER_ROW {
        return Err(RowError::FieldCount(record.len()));
    }

    let mut fields = [""; FIELDS_PER_ROW];
    for (i, raw) in record.iter().enumerate() {
        fields[i] = std::str::from_utf8(raw)
            .map_err(|_| RowError::InvalidUtf8(i + 1))?
            .trim();
    }

    let [host, range_start, range_end] = fields;
    if host.is_empty() {
        return Err(RowError::EmptyHost);
    }
    Ok(WorkItem::new(host, range_start, range_end, source_line))
}

/// Read every record from `reader` and send it to `queue` in input order.
///
/// The first record is the header. Returns once input is exhausted; dropping
/// `queue` on return is the end-of-input signal for the dispatcher.
pub async fn read_work_items<R>(reader: R, queue: mpsc::Sender<WorkItem>) -> SourceSummary
where
    R: AsyncRead + Unpin + Send,
{
    let mut csv = AsyncReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .create_reader(reader);
    let mut record = ByteRecord::new();
    let mut summary = SourceSummary::default();

    loop {
        match csv.read_byte_record(&mut record).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                warn!(error = %e, "input read failed, ending input");
                break;
            }
        }
        let line = record.position().map_or(0, |p| p.line());

        match parse_record(&record, line) {
            Ok(item) => {
                if queue.send(item).await.is_err() {
                    warn!(line, "work queue closed before input was exhausted");
                    break;
                }
                summary.rows_read += 1;
            }
            Err(e) => {
                warn!(line, error = %e, "skipping invalid row");
                summary.rows_skipped += 1;
                metrics::input_rows_skipped().add(1, &[]);
            }
        }
    }

    info!(
        rows_read = summary.rows_read,
        rows_skipped = summary.rows_skipped,
        "finished reading input"
    );
    summary
}
