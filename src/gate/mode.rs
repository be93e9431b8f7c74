//! Detection mode selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which signal decides whether a request is secure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMode {
    /// Trust only the transport-layer indicator.
    ///
    /// Correct when this server terminates TLS itself.
    #[default]
    #[serde(alias = "only_connection_state")]
    ConnectionState,

    /// Trust only the forwarded-protocol header.
    ///
    /// Correct behind a trusted reverse proxy that terminates TLS and
    /// forwards plaintext; the connection itself always reads as plain there.
    #[serde(alias = "only_proxy")]
    ProxyHeader,

    /// Secure if either signal says so.
    #[serde(alias = "all")]
    Either,
}

impl DetectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMode::ConnectionState => "connection_state",
            DetectionMode::ProxyHeader => "proxy_header",
            DetectionMode::Either => "either",
        }
    }
}

impl fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a mode name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown detection mode '{0}' (expected connection_state, proxy_header or either)")]
pub struct ParseModeError(pub String);

impl FromStr for DetectionMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "connection_state" | "only_connection_state" => Ok(DetectionMode::ConnectionState),
            "proxy_header" | "only_proxy" => Ok(DetectionMode::ProxyHeader),
            "either" | "all" => Ok(DetectionMode::Either),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}
