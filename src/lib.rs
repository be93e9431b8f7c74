//! HTTPS gate: redirect requests that did not arrive over TLS.
//!
//! The [`gate`] module is the whole decision engine and can be used on its
//! own as a tower layer. The remaining modules wire it into a runnable
//! server.
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use https_gate::gate::{Bypass, DetectionMode, GateConfig, HttpsRedirectLayer};
//!
//! let gate = GateConfig::new()
//!     .with_mode(DetectionMode::ProxyHeader)
//!     .with_bypass(Bypass::paths(["/health"]));
//!
//! let app: Router = Router::new()
//!     .route("/", get(|| async { "hello" }))
//!     .layer(HttpsRedirectLayer::new(gate));
//! ```

// Core
pub mod gate;

// Server wiring
pub mod config;
pub mod http;
pub mod net;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::GateServerConfig;
pub use gate::{DetectionMode, GateConfig, HttpsRedirectLayer};
pub use crate::http::HttpServer;
pub use lifecycle::Shutdown;
