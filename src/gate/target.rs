//! Redirect target construction.

use http::uri::{Authority, PathAndQuery, Scheme};
use http::Uri;

use super::context::RequestContext;

/// Errors from building a redirect target.
///
/// Only reachable for requests the HTTP layer should already have rejected.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("request carries no host to redirect to")]
    MissingHost,

    #[error("invalid redirect target: {0}")]
    InvalidTarget(#[from] http::Error),
}

/// Build the `https://` equivalent of the request URL.
///
/// Host (including any port), path and query are copied verbatim; only the
/// scheme changes and userinfo is dropped. An empty path becomes `/`.
pub fn build_secure_url(ctx: &RequestContext<'_>) -> Result<Uri, GateError> {
    let host = ctx.host().ok_or(GateError::MissingHost)?;
    let authority = Authority::try_from(host).map_err(http::Error::from)?;

    let path_and_query = ctx
        .uri()
        .path_and_query()
        .cloned()
        .unwrap_or_else(|| PathAndQuery::from_static("/"));

    let uri = Uri::builder()
        .scheme(Scheme::HTTPS)
        .authority(authority)
        .path_and_query(path_and_query)
        .build()?;

    Ok(uri)
}
