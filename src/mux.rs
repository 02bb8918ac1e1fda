//! Path multiplexer that routers mount onto.
//!
//! Two kinds of pattern, the same ones every HTTP host multiplexer speaks:
//!
//! | Pattern | Matches |
//! |---|---|
//! | `/admin` | exactly `/admin` |
//! | `/admin/` | `/admin/` and everything below it |
//!
//! The longest matching pattern wins, so `/admin/` beats `/` for
//! `/admin/users`. Patterns are registered at startup; the table is
//! read-only while serving.

use std::collections::BTreeMap;

use tracing::warn;

use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::ResponseWriter;
use crate::router;

/// A request multiplexer keyed by path pattern.
#[derive(Default)]
pub struct Mux {
    exact: BTreeMap<String, BoxedHandler>,
    // Subtree patterns, trailing slash included.
    subtrees: BTreeMap<String, BoxedHandler>,
}

impl Mux {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `pattern`. A pattern ending in `/` covers the
    /// whole subtree. Registering the same pattern twice replaces the first
    /// handler.
    pub fn handle(&mut self, pattern: &str, handler: BoxedHandler) -> &mut Self {
        let table = if pattern.ends_with('/') { &mut self.subtrees } else { &mut self.exact };
        if table.insert(pattern.to_owned(), handler).is_some() {
            warn!(pattern, "mux pattern registered twice, previous handler replaced");
        }
        self
    }

    /// The handler that would serve `path`, if any.
    pub fn lookup(&self, path: &str) -> Option<&BoxedHandler> {
        if let Some(handler) = self.exact.get(path) {
            return Some(handler);
        }
        self.subtrees
            .iter()
            .filter(|(pattern, _)| path.starts_with(pattern.as_str()))
            .max_by_key(|(pattern, _)| pattern.len())
            .map(|(_, handler)| handler)
    }
}

impl Handler for Mux {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request) {
        match self.lookup(req.path()) {
            Some(handler) => handler.serve(w, req),
            None => router::not_found(w, req),
        }
    }
}
