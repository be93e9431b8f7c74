//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the application handlers
//! - Wire up middleware (tracing, timeout, HTTPS gate)
//! - Stamp each listener's requests with its ConnectionSecurity
//! - Serve plain HTTP and, when configured, TLS side by side
//! - Drain both listeners on shutdown

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use axum::{http::Uri, routing::get, Router};
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{GateServerConfig, ValidationError};
use crate::gate::{mark_connection, ConnectionSecurity, GateConfig, HttpsRedirectLayer};
use crate::lifecycle::Shutdown;
use crate::net::tls::{load_tls_config, TlsError};

/// Time allowed for in-flight TLS requests after shutdown is triggered.
const TLS_DRAIN_SECS: u64 = 10;

/// Server startup and runtime errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind server: {0}")]
    Bind(std::io::Error),

    #[error("Failed to load TLS configuration: {0}")]
    Tls(#[from] TlsError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("Server error: {0}")]
    Serve(std::io::Error),
}

/// HTTP server that puts the HTTPS gate in front of its handlers.
pub struct HttpServer {
    router: Router,
    config: GateServerConfig,
}

impl HttpServer {
    /// Create a server whose gate comes from the config file settings.
    pub fn new(config: GateServerConfig) -> Result<Self, ServerError> {
        let gate = config.gate.to_gate_config()?;
        Ok(Self::with_gate(config, gate))
    }

    /// Create a server with an explicit gate configuration.
    ///
    /// Use this to install a custom bypass predicate.
    pub fn with_gate(config: GateServerConfig, gate: GateConfig) -> Self {
        tracing::info!(
            mode = %gate.mode,
            forwarded_header = %gate.forwarded_header,
            bypass = ?gate.bypass,
            "HTTPS gate configured"
        );
        let router = Self::build_router(&config, gate);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GateServerConfig, gate: GateConfig) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .fallback(echo_handler)
            .layer(HttpsRedirectLayer::new(gate))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// Router without a connection marker. Requests reaching it are plain
    /// unless the caller inserts [`ConnectionSecurity`] itself.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GateServerConfig {
        &self.config
    }

    /// Run the plain listener, plus the TLS listener if configured, until
    /// `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> Result<(), ServerError> {
        let plain = serve_plain(self.router.clone(), listener, shutdown.subscribe());

        match &self.config.listener.tls {
            Some(tls) => {
                let rustls =
                    load_tls_config(Path::new(&tls.cert_path), Path::new(&tls.key_path)).await?;
                let addr: SocketAddr = tls
                    .bind_address
                    .parse()
                    .map_err(|_| ValidationError::InvalidAddress(tls.bind_address.clone()))?;
                let secure = serve_tls(self.router.clone(), addr, rustls, shutdown.subscribe());
                tokio::try_join!(plain, secure)?;
            }
            None => plain.await?,
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn serve_plain(
    router: Router,
    listener: TcpListener,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), ServerError> {
    let addr = listener.local_addr().map_err(ServerError::Bind)?;
    tracing::info!(address = %addr, "Plain HTTP listener starting");

    let app = router.layer(mark_connection(ConnectionSecurity::Plain));
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await
        .map_err(ServerError::Serve)
}

async fn serve_tls(
    router: Router,
    addr: SocketAddr,
    rustls: RustlsConfig,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), ServerError> {
    tracing::info!(address = %addr, "TLS listener starting");

    let handle = Handle::new();
    let drain = handle.clone();
    tokio::spawn(async move {
        let _ = shutdown.recv().await;
        drain.graceful_shutdown(Some(Duration::from_secs(TLS_DRAIN_SECS)));
    });

    let app = router.layer(mark_connection(ConnectionSecurity::Secure));
    axum_server::bind_rustls(addr, rustls)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .map_err(ServerError::Serve)
}

async fn health_handler() -> &'static str {
    "OK"
}

/// Stand-in application handler: echoes the path it was reached on.
async fn echo_handler(uri: Uri) -> String {
    format!("reached {}", uri)
}
