//! # query-bench
//!
//! Replays time-range queries from a CSV params file against TimescaleDB.
//!
//! Queries are spread over a fixed pool of workers by hashing the host
//! name, so every query for a host runs on the same worker in input order.
//! Workers report one outcome per query to a single aggregator, which
//! produces latency and error statistics once the pool has drained.

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod executor;
pub mod model;
pub mod report;
pub mod source;
pub mod telemetry;
