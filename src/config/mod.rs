//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GateServerConfig (validated, immutable)
//!     → GateSettings::to_gate_config → GateConfig shared via Arc
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    GateServerConfig, GateSettings, ListenerConfig, LogFormat, ObservabilityConfig,
    TimeoutConfig, TlsConfig,
};
pub use validation::ValidationError;
