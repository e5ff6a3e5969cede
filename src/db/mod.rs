//! Postgres/TimescaleDB query executor.
//!
//! One pool per run, sized to the worker count so the number of open
//! sessions never exceeds the number of workers.

use crate::error::{Error, Result};
use crate::executor::QueryExecutor;
use crate::model::{QueryResult, WorkItem};
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

/// Per-minute min/max CPU usage for one host over a time range.
pub const CPU_USAGE_QUERY: &str = "\
SELECT host,
       time_bucket_gapfill('1 minute', ts) AS onemin,
       min(usage),
       max(usage)
FROM cpu_usage
WHERE host = $1
  AND ts BETWEEN $2::timestamptz AND $3::timestamptz
GROUP BY host, onemin
ORDER BY onemin";

/// Executes [`CPU_USAGE_QUERY`] against a pooled Postgres connection.
pub struct PgExecutor {
    pool: PgPool,
    timeout: Option<Duration>,
}

impl PgExecutor {
    /// Connect to Postgres and create a pool of at most `max_connections`.
    pub async fn connect(
        url: &str,
        max_connections: u32,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(url)
            .await?;
        Ok(Self { pool, timeout })
    }

    /// Run `SELECT 1` to check connectivity.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn run_query(&self, item: &WorkItem) -> Result<QueryResult> {
        let rows = sqlx::query(CPU_USAGE_QUERY)
            .bind(item.host.as_str())
            .bind(item.range_start.as_str())
            .bind(item.range_end.as_str())
            .fetch_all(&self.pool)
            .await?;
        Ok(QueryResult {
            rows: rows.len() as u64,
        })
    }
}

#[async_trait]
impl QueryExecutor for PgExecutor {
    async fn execute(&self, item: &WorkItem) -> Result<QueryResult> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run_query(item))
                .await
                .map_err(|_| Error::QueryTimeout(limit))?,
            None => self.run_query(item).await,
        }
    }
}
