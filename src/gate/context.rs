//! Per-request view consumed by the gate.

use http::header::{HeaderName, HOST};
use http::{HeaderMap, Method, Request, Uri};

use super::transport::ConnectionSecurity;

/// Borrowed view of the parts of a request the gate looks at.
///
/// Built once per request and dropped when the decision is made.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    method: &'a Method,
    uri: &'a Uri,
    headers: &'a HeaderMap,
    connection: ConnectionSecurity,
    forwarded_proto: Option<&'a str>,
}

impl<'a> RequestContext<'a> {
    /// Build a context from a request, reading the forwarded protocol from
    /// `forwarded_header`.
    pub fn from_request<B>(req: &'a Request<B>, forwarded_header: &HeaderName) -> Self {
        let connection = req
            .extensions()
            .get::<ConnectionSecurity>()
            .copied()
            .unwrap_or_default();

        Self::new(req.method(), req.uri(), req.headers(), connection, forwarded_header)
    }

    pub fn new(
        method: &'a Method,
        uri: &'a Uri,
        headers: &'a HeaderMap,
        connection: ConnectionSecurity,
        forwarded_header: &HeaderName,
    ) -> Self {
        // Non-UTF-8 values can never equal the secure token; treat as absent.
        let forwarded_proto = headers
            .get(forwarded_header)
            .and_then(|v| v.to_str().ok());

        Self {
            method,
            uri,
            headers,
            connection,
            forwarded_proto,
        }
    }

    pub fn method(&self) -> &'a Method {
        self.method
    }

    pub fn uri(&self) -> &'a Uri {
        self.uri
    }

    pub fn headers(&self) -> &'a HeaderMap {
        self.headers
    }

    pub fn path(&self) -> &'a str {
        self.uri.path()
    }

    pub fn query(&self) -> Option<&'a str> {
        self.uri.query()
    }

    /// Host (with port, if any) as the client addressed it.
    ///
    /// The URI authority wins when present (absolute-form and HTTP/2
    /// requests); otherwise the `Host` header is used. Userinfo is never
    /// part of the host.
    pub fn host(&self) -> Option<&'a str> {
        self.uri
            .authority()
            .map(|a| a.as_str())
            .or_else(|| self.headers.get(HOST).and_then(|h| h.to_str().ok()))
            .map(strip_userinfo)
            .filter(|h| !h.is_empty())
    }

    pub fn connection(&self) -> ConnectionSecurity {
        self.connection
    }

    /// Raw forwarded-protocol header value. Client controlled.
    pub fn forwarded_proto(&self) -> Option<&'a str> {
        self.forwarded_proto
    }
}

fn strip_userinfo(authority: &str) -> &str {
    authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host)
}
