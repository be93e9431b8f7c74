//! Tower integration for the gate.

use std::task::{Context, Poll};

use futures_util::future::{ready, Either, Ready};
use http::{Request, Response};
use tower::{Layer, Service};

use super::controller::{redirect_response, rejection_response, Decision, Gate, GateConfig};

/// Layer that applies [`HttpsRedirect`] to an inner service.
#[derive(Debug, Clone, Default)]
pub struct HttpsRedirectLayer {
    gate: Gate,
}

impl HttpsRedirectLayer {
    pub fn new(config: GateConfig) -> Self {
        Self {
            gate: Gate::new(config),
        }
    }

    pub fn from_gate(gate: Gate) -> Self {
        Self { gate }
    }
}

impl<S> Layer<S> for HttpsRedirectLayer {
    type Service = HttpsRedirect<S>;

    fn layer(&self, inner: S) -> Self::Service {
        HttpsRedirect {
            inner,
            gate: self.gate.clone(),
        }
    }
}

/// Middleware that redirects insecure requests to their `https://` URL.
///
/// Secure or bypassed requests reach `inner` untouched. Everything else gets
/// a `301 Moved Permanently` and `inner` is never called. Requests with no
/// usable host get `400 Bad Request`.
#[derive(Debug, Clone)]
pub struct HttpsRedirect<S> {
    inner: S,
    gate: Gate,
}

impl<S> HttpsRedirect<S> {
    pub fn new(inner: S, config: GateConfig) -> Self {
        Self {
            inner,
            gate: Gate::new(config),
        }
    }

    pub fn gate(&self) -> &Gate {
        &self.gate
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for HttpsRedirect<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone,
    ResBody: Default,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = Either<S::Future, Ready<Result<Response<ResBody>, S::Error>>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let response = match self.gate.evaluate_request(&req) {
            Ok(Decision::Forward) => {
                // Call the service that was driven to readiness and keep a fresh
                // clone for the next `poll_ready`.
                let clone = self.inner.clone();
                let mut inner = std::mem::replace(&mut self.inner, clone);
                return Either::Left(inner.call(req));
            }
            Ok(Decision::Redirect(target)) => redirect_response(&target),
            Err(e) => Err(e),
        };

        // Redirects and rejections leave the readied `inner` unused; it is
        // still ready for the next request.
        let response = response.unwrap_or_else(|e| {
            tracing::warn!(error = %e, uri = %req.uri(), "Rejecting request the gate cannot redirect");
            rejection_response()
        });

        Either::Right(ready(Ok(response)))
    }
}
