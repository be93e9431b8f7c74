//! HTTPS gate server.
//!
//! # Architecture Overview
//!
//! ```text
//!   plain :8080 ──▶ mark Plain  ──┐
//!                                 ├──▶ trace ─▶ timeout ─▶ gate ──▶ handlers
//!   tls   :8443 ──▶ mark Secure ──┘                          │
//!                                                            └──▶ 301 https://host/path?query
//! ```
//!
//! The gate forwards a request when it is bypassed or secure under the
//! configured detection mode, and redirects it otherwise.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use https_gate::config::{load_config, GateServerConfig};
use https_gate::gate::DetectionMode;
use https_gate::lifecycle::signals::shutdown_on_signal;
use https_gate::observability::{init_logging, resolve_filter};
use https_gate::{HttpServer, Shutdown};

/// Redirect plaintext HTTP requests to HTTPS
#[derive(Parser, Debug)]
#[command(name = "https-gate", version, about)]
struct Args {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter (e.g., "https_gate=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Override the detection mode (connection_state, proxy_header, either)
    #[arg(short, long)]
    mode: Option<DetectionMode>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GateServerConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.gate.mode = mode;
    }

    let filter = resolve_filter(
        args.log_level,
        std::env::var("RUST_LOG").ok(),
        &config.observability,
    );
    init_logging(&filter, config.observability.log_format);

    tracing::info!("https-gate v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        tls = config.listener.tls.is_some(),
        mode = %config.gate.mode,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    tokio::spawn(shutdown_on_signal(shutdown.clone()));

    let server = HttpServer::new(config)?;
    server.run(listener, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
