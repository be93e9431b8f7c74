//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Plain / TLS listener
//!     → server.rs (connection marker, tracing, timeout)
//!     → gate (redirect or forward)
//!     → application handlers
//! ```

pub mod server;

pub use server::{HttpServer, ServerError};
