//! host-mirror server.
//!
//! Hosts the header-mirror handler behind an HTTP invocation endpoint.
//!
//! ```text
//!   edge platform / test harness
//!        │  POST /invoke  {"request": {"headers": {"host": {...}}}}
//!        ▼
//!   ┌─────────────────────────────────────────────┐
//!   │ http::server  (request id, trace, timeout)  │
//!   │      │                                      │
//!   │      ▼                                      │
//!   │ handler::HeaderMirror  host → x-host        │◀── config (TOML, hot reload)
//!   └─────────────────────────────────────────────┘
//!        │  200 {"headers": {"host": .., "x-host": ..}}
//!        ▼
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use host_mirror::config::watcher::ConfigWatcher;
use host_mirror::http::HttpServer;
use host_mirror::lifecycle::{signals, startup, Shutdown};
use host_mirror::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "host-mirror", version)]
#[command(about = "Copies the Host header into x-host on edge request events", long_about = None)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(short, long, env = "HOST_MIRROR_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Reload mirror settings when the config file changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = startup::resolve_config(cli.config.as_deref(), cli.bind.as_deref())?;
    logging::init_logging(&config.observability)?;

    tracing::info!("host-mirror v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_connections = config.listener.max_connections,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let metrics_handle = if config.observability.metrics_enabled {
        Some(metrics::init_metrics()?)
    } else {
        None
    };

    let (config_updates, _watcher) = match cli.config.as_deref() {
        Some(path) if cli.watch => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (updates, Some(watcher.run()?))
        }
        _ => {
            if cli.watch {
                tracing::warn!("--watch ignored: no config file given");
            }
            let (_, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    let server = HttpServer::with_metrics(config, metrics_handle)?;
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
