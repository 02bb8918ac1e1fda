//! Fallback request router.
//!
//! Several independent request handlers, each a complete little application,
//! share one URL space. The router tries them in registration order. The
//! first one that answers with anything other than `404` wins; a `404` means
//! "not mine", its output is swallowed, and the next candidate gets a turn.
//! When everybody declines, the not-found handler answers.
//!
//! ```text
//! request ─▶ middlewares (live sink)
//!         ─▶ candidate 0 ─ 404? ─ reset ─▶ candidate 1 ─ 404? ─ reset ─▶ … ─▶ not-found
//!                 │                             │
//!                 └─ claimed ─▶ done            └─ claimed ─▶ done
//! ```

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::handler::{BoxedHandler, Handler, boxed};
use crate::interceptor::Interceptor;
use crate::middleware::Middleware;
use crate::mux::Mux;
use crate::request::Request;
use crate::response::{ResponseWriter, ResponseWriterExt};

/// An ordered chain of candidate handlers with a terminal not-found handler.
///
/// Build it once at startup; every registration call returns `self` so they
/// chain. Then either [`mount_to`](FallbackRouter::mount_to) a [`Mux`] or
/// hand it to [`Server::serve`](crate::Server::serve) directly.
///
/// ```rust
/// use http::StatusCode;
/// use wildroute::{ContentType, FallbackRouter, Mux, Request, ResponseWriter, ResponseWriterExt};
///
/// fn blog(w: &mut dyn ResponseWriter, req: &Request) {
///     let _ = if req.path().starts_with("/blog") {
///         w.send(StatusCode::OK, ContentType::Html, "<h1>blog</h1>")
///     } else {
///         w.not_found()
///     };
/// }
///
/// fn shop(w: &mut dyn ResponseWriter, req: &Request) {
///     let _ = if req.path().starts_with("/shop") {
///         w.send(StatusCode::OK, ContentType::Html, "<h1>shop</h1>")
///     } else {
///         w.not_found()
///     };
/// }
///
/// let mut mux = Mux::new();
/// FallbackRouter::new()
///     .add_handler(blog)
///     .add_handler(shop)
///     .mount_to("/", &mut mux);
/// ```
pub struct FallbackRouter {
    middlewares: Vec<Arc<dyn Middleware>>,
    handlers: Vec<BoxedHandler>,
    not_found: Option<BoxedHandler>,
}

impl FallbackRouter {
    pub fn new() -> Self {
        Self { middlewares: Vec::new(), handlers: Vec::new(), not_found: None }
    }

    /// Appends a candidate. Candidates are tried in registration order and
    /// the first claim wins, so register the most specific modules first.
    pub fn add_handler(mut self, handler: impl Handler) -> Self {
        self.handlers.push(boxed(handler));
        self
    }

    /// Appends a middleware. Middlewares run in registration order on every
    /// request, before any candidate, and write straight to the live sink.
    pub fn use_middleware(mut self, middleware: impl Middleware) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Sets the handler that answers when every candidate declines. Its
    /// output is never suppressed, so it may (and usually should) write `404`.
    ///
    /// Without one, the router answers a plain-text `404 page not found`.
    pub fn not_found_handler(mut self, handler: impl Handler) -> Self {
        self.not_found = Some(boxed(handler));
        self
    }

    /// Registers the router on `mux` for `prefix` and everything beneath it.
    ///
    /// The prefix is normalised to a single leading slash and no trailing
    /// one, so `"admin"`, `"/admin"` and `"/admin/"` all mount at `/admin`
    /// and `/admin/…`. Mounting at `"/"` claims the whole tree.
    pub fn mount_to(self, prefix: &str, mux: &mut Mux) {
        let prefix = format!("/{}", prefix.trim_matches('/'));
        let router: BoxedHandler = Arc::new(self);

        if prefix == "/" {
            mux.handle("/", Arc::clone(&router));
            return;
        }
        mux.handle(&prefix, Arc::clone(&router));
        mux.handle(&format!("{prefix}/"), router);
    }
}

impl Default for FallbackRouter {
    fn default() -> Self { Self::new() }
}

impl Handler for FallbackRouter {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request) {
        for middleware in &self.middlewares {
            middleware.process(w, req);
        }

        let mut interceptor = Interceptor::new(w);

        for (index, handler) in self.handlers.iter().enumerate() {
            handler.serve(&mut interceptor, req);
            if interceptor.is_processed() {
                debug!(
                    candidate = index,
                    path = req.path(),
                    status = ?interceptor.status(),
                    "request claimed",
                );
                return;
            }
            trace!(candidate = index, path = req.path(), "candidate declined");
            interceptor.reset();
        }

        debug!(path = req.path(), "no candidate claimed request");
        interceptor.passthrough();
        match &self.not_found {
            Some(handler) => handler.serve(&mut interceptor, req),
            None => not_found(&mut interceptor, req),
        }
        interceptor.finish();
    }
}

/// The default terminal handler: `404` with a short plain-text body.
pub fn not_found(w: &mut dyn ResponseWriter, _req: &Request) {
    if let Err(e) = w.not_found() {
        warn!("writing not-found response failed: {e}");
    }
}
