//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     Trigger → listeners stop accepting → in-flight requests drain → exit
//! ```
//!
//! # Design Decisions
//! - One broadcast channel fans the signal out to every listener
//! - Draining has a deadline; stragglers are dropped after it

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
