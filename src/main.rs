//! Fault proxy
//!
//! An HTTP server that runs every request through a configurable tree of
//! fault injectors before it reaches the downstream.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request      ┌──────────┐    ┌────────────────────┐    ┌────────────┐
//!     ───────────────────▶│   net    │───▶│   http::server     │───▶│ downstream │──▶ Upstream
//!                         │ listener │    │ (injector tree)    │    │ echo/proxy │
//!                         └──────────┘    └─────────┬──────────┘    └────────────┘
//!                                                   │
//!                              reject: connection closed, no response
//!                              error:  canned status + reason phrase
//!                              slow:   delay, then continue
//!
//!     Cross-cutting: config (+ watcher), observability (reporters, metrics),
//!                    lifecycle (shutdown)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use fault_proxy::config::watcher::ConfigWatcher;
use fault_proxy::config::{load_config, FaultConfig};
use fault_proxy::http::{build_downstream, FaultServer};
use fault_proxy::injector::Reporter;
use fault_proxy::lifecycle::{wait_for_signal, Shutdown};
use fault_proxy::net::Listener;
use fault_proxy::observability::{
    logging::init_logging, metrics::init_metrics, FanoutReporter, MetricsReporter, TracingReporter,
};

#[derive(Parser, Debug)]
#[command(name = "fault-proxy", version, about = "HTTP fault injection proxy")]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload the injector tree when the config file changes
    #[arg(short, long, requires = "config")]
    watch: bool,

    /// Validate the config and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => FaultConfig::default(),
    };

    if cli.check {
        println!("Configuration OK (injector: {})", config.injector.kind());
        return Ok(());
    }

    init_logging(&config.observability);
    tracing::info!("fault-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let reporter: Arc<dyn Reporter> = Arc::new(FanoutReporter::new(vec![
        Arc::new(TracingReporter) as Arc<dyn Reporter>,
        Arc::new(MetricsReporter) as Arc<dyn Reporter>,
    ]));

    let downstream = build_downstream(&config.upstream)?;
    let listener = Listener::bind(&config.listener).await?;

    // The watcher must outlive the server loop.
    let (_watcher, config_updates) = match (&cli.config, cli.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        _ => {
            let (_tx, updates) = tokio::sync::mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    let server = FaultServer::new(config, downstream, Some(reporter))?;
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
