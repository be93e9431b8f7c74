//! Bypass predicates.
//!
//! A bypass exempts a request from the gate regardless of channel security.
//! Typical uses: load balancer health checks on plain HTTP, ACME challenges,
//! or environments where everything is already known to be secure.

use std::fmt;
use std::sync::Arc;

use http::Method;

use super::context::RequestContext;

type Predicate = dyn Fn(&RequestContext<'_>) -> bool + Send + Sync;

/// Injected predicate deciding whether a request skips the gate.
#[derive(Clone)]
pub struct Bypass {
    predicate: Arc<Predicate>,
    label: &'static str,
}

impl Bypass {
    /// Wrap an arbitrary predicate.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&RequestContext<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(f),
            label: "custom",
        }
    }

    fn labeled<F>(label: &'static str, f: F) -> Self
    where
        F: Fn(&RequestContext<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(f),
            label,
        }
    }

    /// Never exempt anything. Same as having no bypass configured.
    pub fn never() -> Self {
        Self::labeled("never", |_| false)
    }

    /// Exempt every request.
    pub fn always() -> Self {
        Self::labeled("always", |_| true)
    }

    /// Exempt requests whose path starts with any of `prefixes`.
    pub fn paths<I, P>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let prefixes: Vec<String> = prefixes.into_iter().map(Into::into).collect();
        Self::labeled("paths", move |ctx| {
            let path = ctx.path();
            prefixes.iter().any(|p| path.starts_with(p.as_str()))
        })
    }

    /// Exempt requests using any of `methods`.
    pub fn methods<I>(methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        let methods: Vec<Method> = methods.into_iter().collect();
        Self::labeled("methods", move |ctx| methods.contains(ctx.method()))
    }

    /// Exempt requests that arrived over a plaintext connection.
    pub fn plain_connection() -> Self {
        Self::labeled("plain_connection", |ctx| !ctx.connection().is_secure())
    }

    /// Exempt requests that arrived over a TLS connection.
    pub fn secure_connection() -> Self {
        Self::labeled("secure_connection", |ctx| ctx.connection().is_secure())
    }

    /// Exempt a request if any of `bypasses` does.
    pub fn any<I>(bypasses: I) -> Self
    where
        I: IntoIterator<Item = Bypass>,
    {
        let bypasses: Vec<Bypass> = bypasses.into_iter().collect();
        Self::labeled("any", move |ctx| bypasses.iter().any(|b| b.matches(ctx)))
    }

    /// Evaluate the predicate.
    pub fn matches(&self, ctx: &RequestContext<'_>) -> bool {
        (self.predicate)(ctx)
    }
}

impl Default for Bypass {
    fn default() -> Self {
        Self::never()
    }
}

impl<F> From<F> for Bypass
where
    F: Fn(&RequestContext<'_>) -> bool + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

impl fmt::Debug for Bypass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bypass").field("kind", &self.label).finish()
    }
}
