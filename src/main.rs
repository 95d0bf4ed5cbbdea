//! Locale-aware front proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────────┐
//!                    │                    LOCALE PROXY                       │
//!                    │                                                       │
//!  Client Request    │  ┌─────────┐   ┌──────────┐   ┌──────────┐            │
//!  ──────────────────┼─▶│  http   │──▶│  prefix  │──▶│  locale  │──┐         │
//!                    │  │ server  │   │ resolver │   │ resolver │  │         │
//!                    │  └─────────┘   └──────────┘   └────┬─────┘  │         │
//!                    │                                    │        ▼         │
//!  302 Redirect      │                                    │  ┌──────────┐    │
//!  ◀─────────────────┼────────────────────────────────────┘  │ upstream │────┼──▶ Application
//!                    │                                       │ or echo  │    │
//!  Client Response   │                                       └────┬─────┘    │
//!  ◀─────────────────┼──────────── (+ Set-Cookie: locale) ◀───────┘          │
//!                    └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use locale_proxy::config::{load_config, ProxyConfig};
use locale_proxy::observability::{logging, metrics};
use locale_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "locale-proxy")]
#[command(about = "Locale and subfolder rewriting front proxy", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_tracing(&config.observability);

    tracing::info!("locale-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        config_file = ?cli.config,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
