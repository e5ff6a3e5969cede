//! query-bench CLI: replay a params file against TimescaleDB and print
//! latency statistics.

use clap::Parser;
use query_bench::config::{BenchConfig, Config};
use query_bench::db::PgExecutor;
use query_bench::engine::Benchmark;
use query_bench::source::open_input;
use query_bench::telemetry::{TelemetryConfig, init_telemetry};
use secrecy::ExposeSecret;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "query-bench",
    about = "Benchmark TimescaleDB time-range queries across a pool of workers"
)]
struct Cli {
    /// Number of workers (and database connections) to use
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    workers: u32,

    /// CSV file of `hostname,start_time,end_time` rows; `-` reads stdin
    #[arg(long, default_value = "data/query_params.csv")]
    params_file: PathBuf,

    /// File to append diagnostics to; `-` logs to stderr
    #[arg(long, default_value = "query_bench.log")]
    log_file: PathBuf,

    /// Fail any single query that takes longer than this
    #[arg(long)]
    query_timeout_ms: Option<u64>,

    /// Abort the whole run after this many seconds
    #[arg(long)]
    deadline_secs: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    let log_file = (cli.log_file.as_os_str() != "-").then(|| cli.log_file.clone());
    let _guard = init_telemetry(TelemetryConfig {
        endpoint: config.otel_endpoint.clone(),
        service_name: "query-bench".to_string(),
        log_file,
        log_level: config.log_level.clone(),
    })?;

    let workers = cli.workers as usize;
    info!(workers, params_file = %cli.params_file.display(), "starting");

    let mut bench_config = BenchConfig::new(workers);
    if let Some(secs) = cli.deadline_secs {
        bench_config = bench_config.deadline(Duration::from_secs(secs));
    }

    // Open the input before connecting so a bad path fails without side effects.
    let input = open_input(&cli.params_file).await?;

    let executor = PgExecutor::connect(
        config.database_url.expose_secret(),
        cli.workers,
        cli.query_timeout_ms.map(Duration::from_millis),
    )
    .await?;

    let bench = Benchmark::new(bench_config, Arc::new(executor))?;
    let report = bench.run(input).await?;

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{report}");
    }
    Ok(())
}
