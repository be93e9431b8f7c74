//! Secure-channel detection.
//!
//! # Responsibilities
//! - Decide whether a request's originating connection counts as secure
//! - Honour exactly the signal(s) the configured mode trusts
//!
//! # Design Decisions
//! - The transport signal comes from the listener, never from headers
//! - Header comparison is ASCII case-insensitive and exact (no list parsing)
//! - Recomputed per request, no caching

use super::context::RequestContext;
use super::mode::DetectionMode;
use super::SECURE_SCHEME;

/// Returns true if the request is secure under `mode`.
pub fn is_secure(ctx: &RequestContext<'_>, mode: DetectionMode) -> bool {
    match mode {
        DetectionMode::ConnectionState => connection_is_secure(ctx),
        DetectionMode::ProxyHeader => header_is_secure(ctx),
        DetectionMode::Either => connection_is_secure(ctx) || header_is_secure(ctx),
    }
}

/// Transport-layer check.
pub fn connection_is_secure(ctx: &RequestContext<'_>) -> bool {
    ctx.connection().is_secure()
}

/// Forwarded-protocol header check.
pub fn header_is_secure(ctx: &RequestContext<'_>) -> bool {
    ctx.forwarded_proto()
        .map(|proto| proto.eq_ignore_ascii_case(SECURE_SCHEME))
        .unwrap_or(false)
}
