//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate
//! server. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::config::validation::ValidationError;
use crate::gate::{Bypass, DetectionMode, GateConfig, X_FORWARDED_PROTO};

/// Root configuration for the gate server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateServerConfig {
    /// Listener configuration (plain bind address, optional TLS).
    pub listener: ListenerConfig,

    /// Gate behaviour.
    pub gate: GateSettings,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Plain HTTP bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS listener.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// TLS bind address.
    #[serde(default = "default_tls_bind")]
    pub bind_address: String,

    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

fn default_tls_bind() -> String {
    "0.0.0.0:8443".to_string()
}

/// Gate settings as written in the config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GateSettings {
    /// Which signal decides whether a request is secure.
    pub mode: DetectionMode,

    /// Header carrying the forwarded protocol.
    pub forwarded_header: String,

    /// Path prefixes exempt from the gate (e.g. "/health").
    pub bypass_paths: Vec<String>,

    /// Methods exempt from the gate (e.g. "OPTIONS").
    pub bypass_methods: Vec<String>,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            mode: DetectionMode::default(),
            forwarded_header: X_FORWARDED_PROTO.to_string(),
            bypass_paths: Vec::new(),
            bypass_methods: Vec::new(),
        }
    }
}

impl GateSettings {
    /// Turn file settings into the runtime gate configuration.
    pub fn to_gate_config(&self) -> Result<GateConfig, ValidationError> {
        let header = http::HeaderName::try_from(self.forwarded_header.as_str())
            .map_err(|_| ValidationError::InvalidHeader(self.forwarded_header.clone()))?;

        let methods = self
            .bypass_methods
            .iter()
            .map(|m| {
                http::Method::from_bytes(m.to_ascii_uppercase().as_bytes())
                    .map_err(|_| ValidationError::InvalidMethod(m.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut bypasses = Vec::new();
        if !self.bypass_paths.is_empty() {
            bypasses.push(Bypass::paths(self.bypass_paths.iter().cloned()));
        }
        if !methods.is_empty() {
            bypasses.push(Bypass::methods(methods));
        }

        let mut config = GateConfig::new()
            .with_mode(self.mode)
            .with_forwarded_header(header);
        config.bypass = match bypasses.len() {
            0 => None,
            1 => bypasses.pop(),
            _ => Some(Bypass::any(bypasses)),
        };

        Ok(config)
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive (e.g. "info" or "https_gate=debug").
    pub log_level: Option<String>,

    /// Log output format.
    pub log_format: LogFormat,
}
