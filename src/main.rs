//! Benchmark orchestration service.
//!
//! ```text
//!   GET  /health                   ─┐
//!   GET  /db/user-profile/{email}  ─┼─▶ http ─┬─▶ orchestrator ─▶ store (PostgreSQL | memory)
//!   POST /analytics/aggregate      ─┘         └─▶ aggregation  ─▶ accumulator pool
//! ```
//!
//! Configuration comes from an optional TOML file (`--config` or
//! `BENCH_CONFIG`) with `PORT` and `DB_*` environment overrides on top.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use bench_orchestrator::config::load_config;
use bench_orchestrator::lifecycle::Shutdown;
use bench_orchestrator::observability::{logging, metrics};
use bench_orchestrator::store::{MemoryStore, PostgresStore, ProfileStore};
use bench_orchestrator::HttpServer;

#[derive(Parser)]
#[command(name = "bench-orchestrator")]
#[command(about = "Profile orchestration and order aggregation service", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "BENCH_CONFIG")]
    config: Option<PathBuf>,

    /// Serve from an empty in-process store instead of PostgreSQL.
    #[arg(long)]
    memory_store: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    logging::init_logging(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "bench-orchestrator starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        trending_limit = config.profile.trending_limit,
        posts_limit = config.profile.posts_limit,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store: Arc<dyn ProfileStore> = if args.memory_store {
        tracing::warn!("Using in-memory store; data is not persisted");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(PostgresStore::connect(&config.database).await?)
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, store);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
