//! Run orchestration: wire source, dispatcher, workers and aggregator, and
//! shut them down in order.
//!
//! Shutdown is driven entirely by channel closure:
//! source exhausted → work queue closed → dispatcher closes worker queues →
//! workers drain and exit → last outcome sender dropped → aggregator finishes.

use crate::config::BenchConfig;
use crate::error::{Error, Result};
use crate::executor::QueryExecutor;
use crate::model::{Outcome, SourceSummary, WorkItem};
use crate::report::RunReport;
use crate::source::read_work_items;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use super::dispatch::dispatch;
use super::stats::{AggregateReport, aggregate};
use super::worker::run_worker;

/// A configured benchmark, ready to replay an input.
pub struct Benchmark {
    config: BenchConfig,
    executor: Arc<dyn QueryExecutor>,
}

impl Benchmark {
    /// Validates `config` up front so a bad pool never starts.
    pub fn new(config: BenchConfig, executor: Arc<dyn QueryExecutor>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, executor })
    }

    /// Replay every row of `input` and return the final report.
    ///
    /// # Errors
    ///
    /// Per-query failures never surface here. Errors are limited to a task
    /// panicking and the optional deadline elapsing.
    pub async fn run<R>(&self, input: R) -> Result<RunReport>
    where
        R: AsyncRead + Unpin + Send,
    {
        let run_id = Uuid::new_v4();
        let span = info_span!("bench.run", run.id = %run_id, workers = self.config.workers);
        let started_at = chrono::Utc::now();
        let clock = Instant::now();

        let pipeline = self.run_pipeline(input).instrument(span);
        let (source, stats) = match self.config.deadline {
            Some(limit) => tokio::time::timeout(limit, pipeline)
                .await
                .map_err(|_| Error::DeadlineExceeded(limit))??,
            None => pipeline.await?,
        };

        Ok(RunReport {
            run_id,
            workers: self.config.workers,
            started_at,
            wall_time_ms: clock.elapsed().as_secs_f64() * 1e3,
            source,
            stats,
        })
    }

    async fn run_pipeline<R>(&self, input: R) -> Result<(SourceSummary, AggregateReport)>
    where
        R: AsyncRead + Unpin + Send,
    {
        let workers = self.config.workers;
        info!(workers, "starting benchmark");

        let (work_tx, work_rx) = mpsc::channel::<WorkItem>(self.config.work_queue_capacity);
        let (outcome_tx, outcome_rx) =
            mpsc::channel::<Outcome>(self.config.outcome_queue_capacity);

        let aggregator = tokio::spawn(aggregate(outcome_rx).instrument(info_span!("aggregate")));

        let mut pool = JoinSet::new();
        let mut queues = Vec::with_capacity(workers);
        for id in 1..=workers {
            let (tx, rx) = mpsc::channel::<WorkItem>(self.config.worker_queue_capacity);
            queues.push(tx);
            pool.spawn(
                run_worker(id, rx, outcome_tx.clone(), Arc::clone(&self.executor))
                    .instrument(info_span!("worker", id)),
            );
        }
        // Workers now hold the only outcome senders.
        drop(outcome_tx);

        let dispatcher = tokio::spawn(
            dispatch(work_rx, queues.into_boxed_slice()).instrument(info_span!("dispatch")),
        );

        let source = read_work_items(input, work_tx).await;
        let dispatched = dispatcher.await?;

        while let Some(joined) = pool.join_next().await {
            let summary = joined?;
            debug!(
                worker = summary.id,
                processed = summary.processed,
                failed = summary.failed,
                "worker joined"
            );
        }

        let stats = aggregator.await?;
        info!(
            dispatched,
            total = stats.total_count,
            errors = stats.error_count,
            "benchmark finished"
        );
        Ok((source, stats))
    }
}
