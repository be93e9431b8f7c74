//! Transport-layer security marker.
//!
//! The listener that accepted a connection is the only party that knows
//! whether it was TLS. It records that fact as a request extension before the
//! request reaches the gate; a request without the extension counts as plain.

use tower_http::add_extension::AddExtensionLayer;

/// Whether the connection a request arrived on was established over TLS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionSecurity {
    /// Plaintext TCP.
    #[default]
    Plain,
    /// TLS terminated by this server.
    Secure,
}

impl ConnectionSecurity {
    pub fn is_secure(self) -> bool {
        matches!(self, ConnectionSecurity::Secure)
    }
}

/// Layer that stamps every request with a fixed [`ConnectionSecurity`].
///
/// Install one per listener, outside the gate.
pub type MarkConnectionLayer = AddExtensionLayer<ConnectionSecurity>;

/// Build a marker layer for a listener.
pub fn mark_connection(security: ConnectionSecurity) -> MarkConnectionLayer {
    AddExtensionLayer::new(security)
}
