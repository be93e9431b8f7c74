//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, header names and method names
//! - Validate value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::GateServerConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    InvalidAddress(String),

    #[error("invalid forwarded header name '{0}'")]
    InvalidHeader(String),

    #[error("invalid bypass method '{0}'")]
    InvalidMethod(String),

    #[error("bypass path '{0}' must start with '/'")]
    InvalidBypassPath(String),

    #[error("tls.{0} must not be empty")]
    EmptyTlsPath(&'static str),

    #[error("plain and TLS listeners share address '{0}'")]
    DuplicateAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &GateServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&config.listener.bind_address, &mut errors);

    if let Some(tls) = &config.listener.tls {
        check_address(&tls.bind_address, &mut errors);
        if tls.bind_address == config.listener.bind_address {
            errors.push(ValidationError::DuplicateAddress(tls.bind_address.clone()));
        }
        if tls.cert_path.trim().is_empty() {
            errors.push(ValidationError::EmptyTlsPath("cert_path"));
        }
        if tls.key_path.trim().is_empty() {
            errors.push(ValidationError::EmptyTlsPath("key_path"));
        }
    }

    let gate = &config.gate;
    if http::HeaderName::try_from(gate.forwarded_header.as_str()).is_err() {
        errors.push(ValidationError::InvalidHeader(gate.forwarded_header.clone()));
    }
    for method in &gate.bypass_methods {
        if http::Method::from_bytes(method.to_ascii_uppercase().as_bytes()).is_err() {
            errors.push(ValidationError::InvalidMethod(method.clone()));
        }
    }
    for path in &gate.bypass_paths {
        if !path.starts_with('/') {
            errors.push(ValidationError::InvalidBypassPath(path.clone()));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(addr: &str, errors: &mut Vec<ValidationError>) {
    if addr.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress(addr.to_string()));
    }
}
