//! Middleware layer.
//!
//! Middleware runs before the fallback chain, on every request a router
//! receives, and writes straight to the live response sink. It is the right
//! place for cross-cutting concerns: security headers, request tracing,
//! locale or session cookies.
//!
//! A middleware cannot decline or short-circuit dispatch. If it commits a
//! status, the candidate that later claims the request finds the response
//! already started; keep middleware to headers and side effects.

use http::{HeaderName, HeaderValue};
use tracing::debug;

use crate::request::Request;
use crate::response::ResponseWriter;

/// A pre-processing hook.
///
/// Implemented automatically for any function or closure with the signature
/// `fn(&mut dyn ResponseWriter, &Request)`.
pub trait Middleware: Send + Sync + 'static {
    fn process(&self, w: &mut dyn ResponseWriter, req: &Request);
}

impl<F> Middleware for F
where
    F: Fn(&mut dyn ResponseWriter, &Request) + Send + Sync + 'static,
{
    fn process(&self, w: &mut dyn ResponseWriter, req: &Request) {
        self(w, req)
    }
}

// ── Built-ins ─────────────────────────────────────────────────────────────────

/// Sets one fixed header on every response.
///
/// ```rust
/// use http::header::{HeaderName, HeaderValue};
/// use wildroute::{FallbackRouter, middleware};
///
/// let router = FallbackRouter::new().use_middleware(middleware::set_header(
///     HeaderName::from_static("x-content-type-options"),
///     HeaderValue::from_static("nosniff"),
/// ));
/// ```
pub fn set_header(name: HeaderName, value: HeaderValue) -> SetHeader {
    SetHeader { name, value }
}

/// See [`set_header`].
#[derive(Clone, Debug)]
pub struct SetHeader {
    name: HeaderName,
    value: HeaderValue,
}

impl Middleware for SetHeader {
    fn process(&self, w: &mut dyn ResponseWriter, _req: &Request) {
        w.headers_mut().insert(self.name.clone(), self.value.clone());
    }
}

/// Logs method, path and query of every request at `debug`.
pub fn trace(_w: &mut dyn ResponseWriter, req: &Request) {
    debug!(
        method = %req.method(),
        path = req.path(),
        query = req.query().unwrap_or(""),
        "request",
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Recorder;

    #[test]
    fn set_header_overwrites_previous_value() {
        let mut rec = Recorder::new();
        rec.headers_mut().insert("x-powered-by", HeaderValue::from_static("old"));

        set_header(HeaderName::from_static("x-powered-by"), HeaderValue::from_static("wildroute"))
            .process(&mut rec, &Request::get("/"));

        assert_eq!(rec.header("x-powered-by"), Some("wildroute"));
    }

    #[test]
    fn trace_leaves_the_response_alone() {
        let mut rec = Recorder::new();
        trace(&mut rec, &Request::get("/a?b=c"));
        assert!(!rec.is_committed());
        assert!(rec.headers().is_empty());
    }
}
