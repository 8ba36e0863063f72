//! Salmon aquaculture charts behind an authenticated HTTP API.
//!
//! A [`registry::Catalog`] binds public identifiers to a data file and a
//! chart builder. The [`dispatch::Dispatcher`] resolves an identifier,
//! loads the file and builds the artifact, which the [`server`] returns to
//! clients and the [`batch`] generator writes to disk.

pub mod batch;
pub mod charts;
pub mod config;
pub mod constants;
pub mod data;
pub mod dispatch;
pub mod perf;
pub mod registry;
pub mod server;

use tracing_subscriber::{EnvFilter, fmt};

/// Install the `fmt` subscriber, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}
