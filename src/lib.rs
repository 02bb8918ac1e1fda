//! # wildroute
//!
//! Fallback HTTP routing: several independent handler chains share one URL
//! space and are tried in order until one of them claims the request.
//!
//! ## The contract
//!
//! A candidate handler either answers (any status but `404`, or a body with
//! no status at all) or declines by writing `404`. A declining candidate's
//! status, headers and body never reach the client; the next candidate gets
//! a clean slate. If every candidate declines, the not-found handler answers
//! and its output is delivered as-is.
//!
//! What wildroute gives you:
//!
//! - [`FallbackRouter`]: ordered candidates, middlewares, not-found handler
//! - [`Interceptor`]: the write-suppressing response wrapper, usable on its own
//! - [`Mux`]: exact and subtree path patterns to mount routers on
//! - [`Server`]: tokio + hyper, HTTP/1.1 and HTTP/2, graceful shutdown
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use http::StatusCode;
//! use wildroute::{
//!     ContentType, FallbackRouter, Mux, Request, ResponseWriter, ResponseWriterExt, Server,
//!     middleware,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mux = Mux::new();
//!
//!     FallbackRouter::new()
//!         .use_middleware(middleware::trace)
//!         .add_handler(legacy_pages)
//!         .not_found_handler(gone)
//!         .mount_to("/", &mut mux);
//!
//!     Server::bind("0.0.0.0:3000").serve(mux).await.unwrap();
//! }
//!
//! fn legacy_pages(w: &mut dyn ResponseWriter, req: &Request) {
//!     let _ = match req.path() {
//!         "/about" => w.send(StatusCode::OK, ContentType::Html, "<h1>About</h1>"),
//!         _ => w.not_found(),
//!     };
//! }
//!
//! fn gone(w: &mut dyn ResponseWriter, _req: &Request) {
//!     let _ = w.send(StatusCode::NOT_FOUND, ContentType::Html, "<h1>Sorry, this page was gone!</h1>");
//! }
//! ```

mod error;
mod handler;
mod interceptor;
mod mux;
mod request;
mod response;
mod router;
mod server;

pub mod middleware;

pub use error::Error;
pub use handler::{BoxedHandler, Handler};
pub use interceptor::{Decision, Interceptor};
pub use middleware::Middleware;
pub use mux::Mux;
pub use request::Request;
pub use response::{ContentType, Recorder, ResponseWriter, ResponseWriterExt};
pub use router::{FallbackRouter, not_found};
pub use server::{Server, serve_listener};
