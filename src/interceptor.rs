//! The write-suppressing response wrapper used while probing candidates.
//!
//! # State machine (per candidate attempt)
//!
//! ```text
//!            write_header(404)
//!   Unset ─────────────────────▶ Suppressed      writes dropped, Ok(0)
//!     │
//!     │ write_header(≠404) or write(..)
//!     ▼
//!   Forwarding(status)                          everything passes through
//!
//!   reset(): any state ──▶ Unset, staged headers re-read from the live sink
//! ```
//!
//! A `404` that arrives while `Forwarding` is forwarded too: the candidate
//! has already put bytes on the live sink, so it owns the response.
//!
//! Each attempt edits a copy of the live headers (middleware output
//! included), so `insert` replaces and `append` adds exactly as they would on
//! the live map. The copy replaces the live headers when the first status or
//! body byte is forwarded, or when [`Interceptor::finish`] runs. A candidate
//! that declines therefore leaves no trace on the live sink at all.

use std::io;

use http::{HeaderMap, StatusCode};

use crate::response::ResponseWriter;

/// Where the current attempt stands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Decision {
    /// Nothing written yet.
    Unset,
    /// The candidate answered `404`; its output is being dropped.
    Suppressed,
    /// The candidate claimed the request; output reaches the live sink.
    Forwarding(StatusCode),
}

/// Wraps the live sink for one request.
///
/// Created by the router per request; candidates see it as a plain
/// [`ResponseWriter`].
pub struct Interceptor<'a> {
    inner: &'a mut dyn ResponseWriter,
    staged: HeaderMap,
    // Set whenever the candidate may have touched `staged`.
    dirty: bool,
    decision: Decision,
    passthrough: bool,
}

impl<'a> Interceptor<'a> {
    pub fn new(inner: &'a mut dyn ResponseWriter) -> Self {
        let staged = inner.headers_mut().clone();
        Self {
            inner,
            staged,
            dirty: false,
            decision: Decision::Unset,
            passthrough: false,
        }
    }

    pub fn decision(&self) -> Decision {
        self.decision
    }

    /// The last status recorded in this attempt. A body write with no prior
    /// status records `200`.
    pub fn status(&self) -> Option<StatusCode> {
        match self.decision {
            Decision::Unset => None,
            Decision::Suppressed => Some(StatusCode::NOT_FOUND),
            Decision::Forwarding(status) => Some(status),
        }
    }

    /// True once the current attempt has put anything on the live sink.
    pub fn is_processed(&self) -> bool {
        matches!(self.decision, Decision::Forwarding(_))
    }

    /// Forgets the current attempt so the next candidate starts clean.
    pub fn reset(&mut self) {
        self.staged = self.inner.headers_mut().clone();
        self.dirty = false;
        self.decision = Decision::Unset;
        self.passthrough = false;
    }

    /// Disables suppression for the rest of the request: every status,
    /// `404` included, and every write is forwarded.
    pub fn passthrough(&mut self) {
        self.passthrough = true;
    }

    /// Delivers header edits that were never followed by a status or a
    /// body write, e.g. a terminal handler that only sets `location`.
    /// Only meaningful once the attempt's output is known to go through.
    pub fn finish(&mut self) {
        if self.passthrough || self.is_processed() {
            self.flush_headers();
        }
    }

    fn flush_headers(&mut self) {
        if !self.dirty {
            return;
        }
        *self.inner.headers_mut() = self.staged.clone();
        self.dirty = false;
    }

    fn forward_status(&mut self, status: StatusCode) {
        self.flush_headers();
        self.inner.write_header(status);
        self.decision = Decision::Forwarding(status);
    }
}

impl ResponseWriter for Interceptor<'_> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.dirty = true;
        &mut self.staged
    }

    fn write_header(&mut self, status: StatusCode) {
        let claimed = matches!(self.decision, Decision::Forwarding(_));
        if status == StatusCode::NOT_FOUND && !self.passthrough && !claimed {
            self.decision = Decision::Suppressed;
            return;
        }
        self.forward_status(status);
    }

    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        match self.decision {
            Decision::Suppressed if !self.passthrough => Ok(0),
            Decision::Unset => {
                self.forward_status(StatusCode::OK);
                self.inner.write(data)
            }
            _ => {
                self.flush_headers();
                self.inner.write(data)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use http::header::{CONTENT_TYPE, HeaderValue, LOCATION, SET_COOKIE};

    use super::*;
    use crate::response::Recorder;

    #[test]
    fn starts_unset_and_unprocessed() {
        let mut rec = Recorder::new();
        let w = Interceptor::new(&mut rec);
        assert_eq!(w.decision(), Decision::Unset);
        assert_eq!(w.status(), None);
        assert!(!w.is_processed());
    }

    #[test]
    fn not_found_is_recorded_but_not_forwarded() {
        let mut rec = Recorder::new();
        {
            let mut w = Interceptor::new(&mut rec);
            w.write_header(StatusCode::NOT_FOUND);
            assert_eq!(w.decision(), Decision::Suppressed);
            assert_eq!(w.status(), Some(StatusCode::NOT_FOUND));
            assert!(!w.is_processed());
        }
        assert!(!rec.is_committed());
    }

    #[test]
    fn writes_after_not_found_are_dropped_without_error() {
        let mut rec = Recorder::new();
        {
            let mut w = Interceptor::new(&mut rec);
            w.write_header(StatusCode::NOT_FOUND);
            assert_eq!(w.write(b"X").unwrap(), 0);
        }
        assert!(rec.body().is_empty());
    }

    #[test]
    fn other_status_is_forwarded_and_claims() {
        let mut rec = Recorder::new();
        {
            let mut w = Interceptor::new(&mut rec);
            w.write_header(StatusCode::FORBIDDEN);
            assert_eq!(w.decision(), Decision::Forwarding(StatusCode::FORBIDDEN));
            assert!(w.is_processed());
            w.write(b"no").unwrap();
        }
        assert_eq!(rec.status(), StatusCode::FORBIDDEN);
        assert_eq!(rec.body(), b"no");
    }

    #[test]
    fn bare_write_is_an_implicit_ok() {
        let mut rec = Recorder::new();
        {
            let mut w = Interceptor::new(&mut rec);
            assert_eq!(w.write(b"hi").unwrap(), 2);
            assert_eq!(w.status(), Some(StatusCode::OK));
            assert!(w.is_processed());
        }
        assert_eq!(rec.status(), StatusCode::OK);
        assert_eq!(rec.body(), b"hi");
    }

    #[test]
    fn late_not_found_after_claim_still_forwards() {
        let mut rec = Recorder::new();
        {
            let mut w = Interceptor::new(&mut rec);
            w.write_header(StatusCode::OK);
            w.write_header(StatusCode::NOT_FOUND);
            assert!(w.is_processed());
            w.write(b"still mine").unwrap();
        }
        // the live sink keeps the first committed status
        assert_eq!(rec.status(), StatusCode::OK);
        assert_eq!(rec.body(), b"still mine");
    }

    #[test]
    fn staged_headers_travel_with_first_forwarded_call() {
        let mut rec = Recorder::new();
        {
            let mut w = Interceptor::new(&mut rec);
            w.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("text/moduleA"));
            w.headers_mut().append("x-tag", HeaderValue::from_static("a"));
            w.headers_mut().append("x-tag", HeaderValue::from_static("b"));
            w.write(b"Module A handled").unwrap();
        }
        assert_eq!(rec.header("content-type"), Some("text/moduleA"));
        let tags: Vec<_> = rec.headers().get_all("x-tag").iter().collect();
        assert_eq!(tags, ["a", "b"]);
    }

    #[test]
    fn reset_discards_declined_headers_and_state() {
        let mut rec = Recorder::new();
        rec.headers_mut().insert("x-middleware", HeaderValue::from_static("kept"));
        {
            let mut w = Interceptor::new(&mut rec);
            w.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("text/declined"));
            w.write_header(StatusCode::NOT_FOUND);
            w.reset();
            assert_eq!(w.decision(), Decision::Unset);

            w.write(b"next").unwrap();
        }
        assert_eq!(rec.header("content-type"), None);
        assert_eq!(rec.header("x-middleware"), Some("kept"));
        assert_eq!(rec.body(), b"next");
    }

    #[test]
    fn passthrough_forwards_not_found() {
        let mut rec = Recorder::new();
        {
            let mut w = Interceptor::new(&mut rec);
            w.passthrough();
            w.write_header(StatusCode::NOT_FOUND);
            w.write(b"gone").unwrap();
        }
        assert_eq!(rec.status(), StatusCode::NOT_FOUND);
        assert_eq!(rec.body(), b"gone");
    }

    #[test]
    fn status_after_not_found_claims_and_forwards() {
        let mut rec = Recorder::new();
        {
            let mut w = Interceptor::new(&mut rec);
            w.write_header(StatusCode::NOT_FOUND);
            w.write_header(StatusCode::OK);
            assert_eq!(w.decision(), Decision::Forwarding(StatusCode::OK));
            assert!(w.is_processed());
            assert_eq!(w.write(b"changed my mind").unwrap(), 15);
        }
        assert_eq!(rec.status(), StatusCode::OK);
        assert_eq!(rec.body(), b"changed my mind");
    }

    #[test]
    fn appended_headers_keep_live_values() {
        let mut rec = Recorder::new();
        rec.headers_mut().append(SET_COOKIE, HeaderValue::from_static("session=abc"));
        {
            let mut w = Interceptor::new(&mut rec);
            w.headers_mut().append(SET_COOKIE, HeaderValue::from_static("locale=en"));
            w.write(b"ok").unwrap();
        }
        let cookies: Vec<_> = rec.headers().get_all(SET_COOKIE).iter().collect();
        assert_eq!(cookies, ["session=abc", "locale=en"]);
    }

    #[test]
    fn inserted_headers_replace_live_values() {
        let mut rec = Recorder::new();
        rec.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        {
            let mut w = Interceptor::new(&mut rec);
            w.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
            w.write(b"<p>").unwrap();
        }
        let values: Vec<_> = rec.headers().get_all(CONTENT_TYPE).iter().collect();
        assert_eq!(values, ["text/html"]);
    }

    #[test]
    fn finish_delivers_header_only_passthrough() {
        let mut rec = Recorder::new();
        {
            let mut w = Interceptor::new(&mut rec);
            w.passthrough();
            w.headers_mut().insert(LOCATION, HeaderValue::from_static("/home"));
            w.finish();
        }
        assert!(!rec.is_committed());
        assert_eq!(rec.header("location"), Some("/home"));
    }

    #[test]
    fn finish_keeps_declined_headers_staged() {
        let mut rec = Recorder::new();
        {
            let mut w = Interceptor::new(&mut rec);
            w.headers_mut().insert(LOCATION, HeaderValue::from_static("/elsewhere"));
            w.write_header(StatusCode::NOT_FOUND);
            w.finish();
        }
        assert_eq!(rec.header("location"), None);
    }
}
