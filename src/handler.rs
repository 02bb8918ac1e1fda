//! Handler trait and type erasure.
//!
//! # What a handler is
//!
//! A handler receives the request and a [`ResponseWriter`] and writes its
//! answer. There is no return value: "I don't know this path" is expressed by
//! writing a `404`, which is exactly the signal a
//! [`FallbackRouter`](crate::FallbackRouter) uses to move on to the next
//! candidate.
//!
//! # How handlers are stored
//!
//! A router holds candidates of *different* concrete types in one `Vec`, so
//! each one is erased behind `Arc<dyn Handler>`:
//!
//! ```text
//! fn module_a(w: &mut dyn ResponseWriter, req: &Request) { … }  ← user writes this
//!        ↓ router.add_handler(module_a)
//! Arc::new(module_a)                                           ← BoxedHandler
//!        ↓
//! handler.serve(&mut interceptor, &req)  at request time        ← one vtable call
//! ```
//!
//! Serving is synchronous: a candidate finishes writing before the router
//! inspects what it wrote.

use std::sync::Arc;

use crate::request::Request;
use crate::response::ResponseWriter;

/// A heap-allocated, type-erased handler shared across concurrent requests.
pub type BoxedHandler = Arc<dyn Handler>;

/// A unit that answers requests.
///
/// Implemented automatically for any function or closure with the signature
///
/// ```text
/// fn name(w: &mut dyn ResponseWriter, req: &Request)
/// ```
///
/// and implementable by hand for stateful modules:
///
/// ```rust
/// use http::StatusCode;
/// use wildroute::{ContentType, Handler, Request, ResponseWriter, ResponseWriterExt};
///
/// struct Downloads {
///     prefix: &'static str,
/// }
///
/// impl Handler for Downloads {
///     fn serve(&self, w: &mut dyn ResponseWriter, req: &Request) {
///         let _ = match req.path().strip_prefix(self.prefix) {
///             Some(name) => w.send(StatusCode::OK, ContentType::OctetStream, name),
///             None => w.not_found(),
///         };
///     }
/// }
/// ```
pub trait Handler: Send + Sync + 'static {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request);
}

impl<F> Handler for F
where
    F: Fn(&mut dyn ResponseWriter, &Request) + Send + Sync + 'static,
{
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request) {
        self(w, req)
    }
}

pub(crate) fn boxed(handler: impl Handler) -> BoxedHandler {
    Arc::new(handler)
}
