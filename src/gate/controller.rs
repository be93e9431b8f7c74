//! Gate controller: bypass, then detect, then redirect.

use std::sync::Arc;

use http::header::{HeaderName, HeaderValue, LOCATION};
use http::{Request, Response, StatusCode, Uri};

use super::bypass::Bypass;
use super::context::RequestContext;
use super::detector::is_secure;
use super::mode::DetectionMode;
use super::target::{build_secure_url, GateError};
use super::X_FORWARDED_PROTO;

/// Runtime configuration for one gate installation.
///
/// Immutable once handed to [`Gate::new`].
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Which signal decides whether a request is secure.
    pub mode: DetectionMode,

    /// Optional exemption checked before detection. `None` never bypasses.
    pub bypass: Option<Bypass>,

    /// Header carrying the forwarded protocol. Only read in
    /// `ProxyHeader` and `Either` modes.
    pub forwarded_header: HeaderName,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            mode: DetectionMode::default(),
            bypass: None,
            forwarded_header: HeaderName::from_static(X_FORWARDED_PROTO),
        }
    }
}

impl GateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: DetectionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_bypass(mut self, bypass: impl Into<Bypass>) -> Self {
        self.bypass = Some(bypass.into());
        self
    }

    pub fn with_forwarded_header(mut self, header: HeaderName) -> Self {
        self.forwarded_header = header;
        self
    }
}

/// Outcome for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Hand the request to the wrapped handler unchanged.
    Forward,
    /// Answer with a permanent redirect to this URL.
    Redirect(Uri),
}

/// Stateless decision engine shared by every clone of the middleware.
#[derive(Debug, Clone, Default)]
pub struct Gate {
    config: Arc<GateConfig>,
}

impl Gate {
    pub fn new(config: GateConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Classify a request.
    pub fn evaluate(&self, ctx: &RequestContext<'_>) -> Result<Decision, GateError> {
        if let Some(bypass) = &self.config.bypass {
            if bypass.matches(ctx) {
                tracing::debug!(path = %ctx.path(), bypass = ?bypass, "Gate bypassed");
                return Ok(Decision::Forward);
            }
        }

        if is_secure(ctx, self.config.mode) {
            return Ok(Decision::Forward);
        }

        let target = build_secure_url(ctx)?;
        tracing::debug!(
            mode = %self.config.mode,
            path = %ctx.path(),
            location = %target,
            "Redirecting insecure request"
        );
        Ok(Decision::Redirect(target))
    }

    /// Build the context for `req` with this gate's header and classify it.
    pub fn evaluate_request<B>(&self, req: &Request<B>) -> Result<Decision, GateError> {
        let ctx = RequestContext::from_request(req, &self.config.forwarded_header);
        self.evaluate(&ctx)
    }
}

/// `301 Moved Permanently` pointing at `target`, with an empty body.
pub fn redirect_response<B: Default>(target: &Uri) -> Result<Response<B>, GateError> {
    let location = HeaderValue::try_from(target.to_string()).map_err(http::Error::from)?;

    let mut response = Response::new(B::default());
    *response.status_mut() = StatusCode::MOVED_PERMANENTLY;
    response.headers_mut().insert(LOCATION, location);
    Ok(response)
}

/// Response for requests that cannot be redirected.
pub fn rejection_response<B: Default>() -> Response<B> {
    let mut response = Response::new(B::default());
    *response.status_mut() = StatusCode::BAD_REQUEST;
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::transport::ConnectionSecurity;
    use http::header::HOST;
    use http::Method;

    fn plain(uri: &str) -> Request<()> {
        Request::builder().uri(uri).body(()).unwrap()
    }

    fn secure(uri: &str) -> Request<()> {
        let mut req = plain(uri);
        req.extensions_mut().insert(ConnectionSecurity::Secure);
        req
    }

    fn with_proto(uri: &str, proto: &str) -> Request<()> {
        Request::builder()
            .uri(uri)
            .header(X_FORWARDED_PROTO, proto)
            .body(())
            .unwrap()
    }

    fn redirect(to: &str) -> Decision {
        Decision::Redirect(to.parse().unwrap())
    }

    #[test]
    fn test_default_redirects_plaintext() {
        let gate = Gate::default();
        let decision = gate.evaluate_request(&plain("http://example.test/foo?q=1")).unwrap();
        assert_eq!(decision, redirect("https://example.test/foo?q=1"));
    }

    #[test]
    fn test_default_forwards_secure_connection() {
        let gate = Gate::default();
        let decision = gate.evaluate_request(&secure("https://example.test/foo")).unwrap();
        assert_eq!(decision, Decision::Forward);
    }

    #[test]
    fn test_connection_state_ignores_spoofed_header() {
        let gate = Gate::new(GateConfig::new().with_mode(DetectionMode::ConnectionState));
        let decision = gate
            .evaluate_request(&with_proto("http://example.test/", "https"))
            .unwrap();
        assert_eq!(decision, redirect("https://example.test/"));
    }

    #[test]
    fn test_proxy_header_mode() {
        let gate = Gate::new(GateConfig::new().with_mode(DetectionMode::ProxyHeader));

        let decision = gate
            .evaluate_request(&with_proto("http://example.test/a", "http"))
            .unwrap();
        assert_eq!(decision, redirect("https://example.test/a"));

        let decision = gate
            .evaluate_request(&with_proto("http://example.test/a", "https"))
            .unwrap();
        assert_eq!(decision, Decision::Forward);

        // A direct TLS connection without the header is not trusted here.
        let decision = gate.evaluate_request(&secure("https://example.test/a")).unwrap();
        assert_eq!(decision, redirect("https://example.test/a"));
    }

    #[test]
    fn test_either_mode_disagreeing_signals_forward() {
        let gate = Gate::new(GateConfig::new().with_mode(DetectionMode::Either));

        let mut req = with_proto("http://example.test/", "http");
        req.extensions_mut().insert(ConnectionSecurity::Secure);
        assert_eq!(gate.evaluate_request(&req).unwrap(), Decision::Forward);

        let req = with_proto("http://example.test/", "HTTPS");
        assert_eq!(gate.evaluate_request(&req).unwrap(), Decision::Forward);

        let req = with_proto("http://example.test/", "http");
        assert_eq!(
            gate.evaluate_request(&req).unwrap(),
            redirect("https://example.test/")
        );
    }

    #[test]
    fn test_bypass_overrides_every_mode() {
        for mode in [
            DetectionMode::ConnectionState,
            DetectionMode::ProxyHeader,
            DetectionMode::Either,
        ] {
            let gate = Gate::new(GateConfig::new().with_mode(mode).with_bypass(Bypass::always()));
            assert_eq!(
                gate.evaluate_request(&plain("http://example.test/")).unwrap(),
                Decision::Forward,
                "mode {mode}"
            );
            // Even a request with no host is forwarded.
            assert_eq!(gate.evaluate_request(&plain("/")).unwrap(), Decision::Forward);
        }
    }

    #[test]
    fn test_bypass_false_falls_through() {
        let gate = Gate::new(GateConfig::new().with_bypass(Bypass::methods([Method::OPTIONS])));
        assert_eq!(
            gate.evaluate_request(&plain("http://example.test/")).unwrap(),
            redirect("https://example.test/")
        );
    }

    #[test]
    fn test_redirect_target_is_not_redirected_again() {
        for mode in [
            DetectionMode::ConnectionState,
            DetectionMode::ProxyHeader,
            DetectionMode::Either,
        ] {
            let gate = Gate::new(GateConfig::new().with_mode(mode));
            let first = Request::builder()
                .uri("/p?x=1")
                .header(HOST, "example.test:8080")
                .header(X_FORWARDED_PROTO, "http")
                .body(())
                .unwrap();
            let Decision::Redirect(target) = gate.evaluate_request(&first).unwrap() else {
                panic!("expected redirect under {mode}");
            };

            // Follow the redirect the way a client would reach us next time.
            let mut second = Request::builder()
                .uri(target)
                .header(X_FORWARDED_PROTO, "https")
                .body(())
                .unwrap();
            second.extensions_mut().insert(ConnectionSecurity::Secure);
            assert_eq!(gate.evaluate_request(&second).unwrap(), Decision::Forward);
        }
    }

    #[test]
    fn test_custom_forwarded_header() {
        let gate = Gate::new(
            GateConfig::new()
                .with_mode(DetectionMode::ProxyHeader)
                .with_forwarded_header(HeaderName::from_static("x-forwarded-scheme")),
        );
        let req = Request::builder()
            .uri("http://example.test/")
            .header("x-forwarded-scheme", "https")
            .body(())
            .unwrap();
        assert_eq!(gate.evaluate_request(&req).unwrap(), Decision::Forward);

        // The default header name is no longer consulted.
        let req = with_proto("http://example.test/", "https");
        assert!(matches!(gate.evaluate_request(&req).unwrap(), Decision::Redirect(_)));
    }

    #[test]
    fn test_missing_host_is_an_error() {
        let gate = Gate::default();
        assert!(matches!(
            gate.evaluate_request(&plain("/")),
            Err(GateError::MissingHost)
        ));
    }

    #[test]
    fn test_redirect_response_shape() {
        let target: Uri = "https://example.test/foo?q=1".parse().unwrap();
        let response: Response<String> = redirect_response(&target).unwrap();
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[LOCATION], "https://example.test/foo?q=1");
        assert!(response.body().is_empty());
    }
}
