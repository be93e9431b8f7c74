//! HTTPS gate subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → transport.rs (listener stamps ConnectionSecurity)
//!     → layer.rs (tower service, builds RequestContext)
//!     → controller.rs
//!         → bypass.rs (exempt? forward)
//!         → detector.rs (secure? forward)
//!         → target.rs (build https:// Location)
//!     → 301 Moved Permanently, or inner service
//! ```
//!
//! # Design Decisions
//! - Pure decision: (request, config) → Forward | Redirect
//! - Config is immutable and shared via Arc across service clones
//! - Forwarded headers are only trusted when the mode says so
//! - Missing host fails closed with 400

pub mod bypass;
pub mod context;
pub mod controller;
pub mod detector;
pub mod layer;
pub mod mode;
pub mod target;
pub mod transport;

pub use bypass::Bypass;
pub use context::RequestContext;
pub use controller::{redirect_response, rejection_response, Decision, Gate, GateConfig};
pub use detector::is_secure;
pub use layer::{HttpsRedirect, HttpsRedirectLayer};
pub use mode::DetectionMode;
pub use target::{build_secure_url, GateError};
pub use transport::{mark_connection, ConnectionSecurity, MarkConnectionLayer};

/// Default header consulted for the forwarded protocol.
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Scheme token the gate redirects to and accepts as secure.
pub const SECURE_SCHEME: &str = "https";
