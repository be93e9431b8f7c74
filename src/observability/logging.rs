//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Pick the filter: CLI flag > RUST_LOG > config file > default
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, text format for development

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Default log filter when nothing else is configured.
pub const DEFAULT_LOG_FILTER: &str = "https_gate=debug,tower_http=debug";

/// Choose the filter directive by priority.
pub fn resolve_filter(
    cli: Option<String>,
    env: Option<String>,
    config: &ObservabilityConfig,
) -> String {
    let non_empty = |level: Option<String>| level.filter(|l| !l.trim().is_empty());

    non_empty(cli)
        .or_else(|| non_empty(env))
        .or_else(|| non_empty(config.log_level.clone()))
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

/// Install the global subscriber.
pub fn init_logging(filter: &str, format: LogFormat) {
    let registry = tracing_subscriber::registry().with(EnvFilter::new(filter));

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
