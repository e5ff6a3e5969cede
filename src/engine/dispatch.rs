//! Host-affine dispatch of work items across the worker pool.

use crate::model::WorkItem;
use crate::telemetry::metrics;
use opentelemetry::KeyValue;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

const FNV32_OFFSET: u32 = 0x811c_9dc5;
const FNV32_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a.
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    let mut hash = FNV32_OFFSET;
    for byte in bytes {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(FNV32_PRIME);
    }
    hash
}

/// Index of the worker that owns `routing_key`.
///
/// Stable across runs and processes, so a host always maps to the same
/// worker for a given pool size.
///
/// # Panics
///
/// Panics if `worker_count` is zero. [`crate::config::BenchConfig::validate`]
/// rejects such pools before any dispatch happens.
pub fn worker_index(routing_key: &str, worker_count: usize) -> usize {
    assert!(worker_count > 0, "worker pool must not be empty");
    fnv1a_32(routing_key.as_bytes()) as usize % worker_count
}

/// Route every item from `work` to its worker's queue, in arrival order.
///
/// Returns once `work` is closed and drained. All worker queues are closed
/// (dropped) before returning; waiting for the workers is the caller's job.
pub async fn dispatch(
    mut work: mpsc::Receiver<WorkItem>,
    queues: Box<[mpsc::Sender<WorkItem>]>,
) -> u64 {
    let routed = metrics::dispatched_items();
    let mut dispatched: u64 = 0;

    while let Some(item) = work.recv().await {
        let index = worker_index(item.routing_key(), queues.len());
        let worker_id = index + 1;
        debug!(
            line = item.source_line,
            host = %item.host,
            worker = worker_id,
            "routing work item"
        );

        if queues[index].send(item).await.is_err() {
            // Only happens if the worker task died.
            error!(worker = worker_id, "worker queue closed, dropping work item");
            continue;
        }
        routed.add(1, &[KeyValue::new("worker", worker_id as i64)]);
        dispatched += 1;
    }

    drop(queues);
    info!(dispatched, "input exhausted, worker queues closed");
    dispatched
}
