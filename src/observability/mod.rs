//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! gate / server / lifecycle
//!     → tracing events with structured fields
//!     → logging.rs (EnvFilter + text or JSON fmt layer)
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Gate decisions log at debug; startup and shutdown at info

pub mod logging;

pub use logging::{init_logging, resolve_filter, DEFAULT_LOG_FILTER};
