//! patroniglue
//!
//! Exposes the Patroni role checks as cached HTTP endpoints.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────┐
//!                         │                  patroniglue                  │
//!   Probe (LB, k8s)       │  ┌──────────┐   ┌────────────┐   ┌─────────┐  │
//!   ──────────────────────┼─▶│   http   │──▶│  backend   │──▶│  cache  │  │
//!                         │  │ handlers │   │  resolver  │   │ (ttl)   │  │
//!   200 / 503 + JSON      │  └──────────┘   └─────┬──────┘   └────▲────┘  │
//!   ◀─────────────────────┼──────                 │ miss          │       │
//!                         │                       ▼               │       │
//!                         │                 GET /{status} ────────┼───────┼──▶ Patroni API
//!                         │                                 evictor task  │
//!                         └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use patroniglue::config::load_config;
use patroniglue::lifecycle::{signals, startup, Shutdown};
use patroniglue::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "patroniglue", version)]
#[command(about = "Cached HTTP health checks for Patroni", long_about = None)]
struct Cli {
    /// Configuration file (YAML or TOML)
    #[arg(long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Only log errors
    #[arg(long)]
    quiet: bool,

    /// Log informative messages
    #[arg(long)]
    verbose: bool,

    /// Log debug messages
    #[arg(long)]
    debug: bool,
}

fn default_config_path() -> PathBuf {
    let home = std::env::var_os("HOME").unwrap_or_default();
    PathBuf::from(home).join(".patroniglue.yml")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    logging::init(logging::LogLevel::from_flags(cli.quiet, cli.verbose, cli.debug));

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "patroniglue starting");

    let config = load_config(&cli.config).map_err(|e| {
        tracing::error!(path = %cli.config.display(), error = %e, "Could not read configuration file");
        e
    })?;

    tracing::info!(
        frontend = %config.frontend.bind_address(),
        tls = config.frontend.tls_files().is_some(),
        backend_host = %config.backend.host,
        backend_port = config.backend.port,
        cache_ttl = config.cache.ttl,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        let signal = signals::wait_for_signal().await;
        tracing::info!(signal, "Shutdown signal received");
        trigger.trigger();
    });

    startup::run(config, &shutdown).await.map_err(|e| {
        tracing::error!(error = %e, "Fatal error");
        e
    })?;

    tracing::info!("Shutdown complete");
    Ok(())
}
