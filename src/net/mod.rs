//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Plain listener
//!     → ConnectionSecurity::Plain stamped on each request
//!     → Hand off to HTTP layer
//!
//! TLS listener
//!     → tls.rs (certificate check & rustls config)
//!     → ConnectionSecurity::Secure stamped on each request
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Only the listener decides whether a connection is secure
//! - TLS is optional and handled by axum-server

pub mod tls;
