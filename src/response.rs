//! The response-sink capability and the live, buffering sink behind it.
//!
//! Handlers never build a response value. They write one, through a
//! [`ResponseWriter`]: set headers, commit a status, append body bytes. That
//! shape is what lets a fallback router slip an interceptor between a
//! candidate and the client and decide, call by call, what gets through.

use std::io;

use bytes::{Bytes, BytesMut};
use http::header::{CONTENT_TYPE, HeaderValue, X_CONTENT_TYPE_OPTIONS};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;
use tracing::warn;

// ── ContentType ───────────────────────────────────────────────────────────────

/// Common content-type values for use with [`ResponseWriterExt::send`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContentType {
    Css,          // text/css; charset=utf-8
    Html,         // text/html; charset=utf-8
    Javascript,   // text/javascript; charset=utf-8
    Json,         // application/json
    OctetStream,  // application/octet-stream  (binary / file download)
    Text,         // text/plain; charset=utf-8
    Xml,          // application/xml
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Css         => "text/css; charset=utf-8",
            Self::Html        => "text/html; charset=utf-8",
            Self::Javascript  => "text/javascript; charset=utf-8",
            Self::Json        => "application/json",
            Self::OctetStream => "application/octet-stream",
            Self::Text        => "text/plain; charset=utf-8",
            Self::Xml         => "application/xml",
        }
    }
}

// ── ResponseWriter ────────────────────────────────────────────────────────────

/// Something a handler writes its response through.
///
/// The contract mirrors the host HTTP stack:
///
/// - headers may be edited until a status is committed;
/// - [`write_header`](ResponseWriter::write_header) commits a status;
/// - [`write`](ResponseWriter::write) appends body bytes, committing `200 OK`
///   first if no status was set.
///
/// Implementations may decline to forward a call (see
/// [`Interceptor`](crate::Interceptor)); a dropped write reports `Ok(0)`.
pub trait ResponseWriter {
    fn headers_mut(&mut self) -> &mut HeaderMap;
    fn write_header(&mut self, status: StatusCode);
    fn write(&mut self, data: &[u8]) -> io::Result<usize>;
}

/// Convenience methods available on every [`ResponseWriter`], including
/// `dyn ResponseWriter`.
pub trait ResponseWriterExt: ResponseWriter {
    /// Sets `content-type`, commits `status`, writes `body`.
    fn send(
        &mut self,
        status: StatusCode,
        content_type: ContentType,
        body: impl AsRef<[u8]>,
    ) -> io::Result<usize> {
        self.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type.as_str()));
        self.write_header(status);
        self.write(body.as_ref())
    }

    /// `send(StatusCode::NOT_FOUND, …)` with the stock plain-text body and
    /// `x-content-type-options: nosniff`: the conventional way for a
    /// candidate to decline.
    fn not_found(&mut self) -> io::Result<usize> {
        self.headers_mut()
            .insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        self.send(StatusCode::NOT_FOUND, ContentType::Text, NOT_FOUND_BODY)
    }
}

impl<W: ResponseWriter + ?Sized> ResponseWriterExt for W {}

pub(crate) const NOT_FOUND_BODY: &str = "404 page not found\n";

// ── Recorder ──────────────────────────────────────────────────────────────────

/// The live response sink: buffers exactly what would reach the client.
///
/// The server hands one `Recorder` per request to the top-level handler and
/// turns it into an `http::Response` afterwards. It is public so handlers and
/// routers can be exercised without a socket:
///
/// ```rust
/// use wildroute::{Handler, Recorder, Request, ResponseWriter};
/// use http::StatusCode;
///
/// fn teapot(w: &mut dyn ResponseWriter, _req: &Request) {
///     w.write_header(StatusCode::IM_A_TEAPOT);
/// }
///
/// let mut rec = Recorder::new();
/// teapot.serve(&mut rec, &Request::get("/"));
/// assert_eq!(rec.status(), StatusCode::IM_A_TEAPOT);
/// ```
#[derive(Debug, Default)]
pub struct Recorder {
    headers: HeaderMap,
    head: Option<(StatusCode, HeaderMap)>,
    body: BytesMut,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed status, or `200 OK` if nothing was committed.
    pub fn status(&self) -> StatusCode {
        self.head.as_ref().map_or(StatusCode::OK, |(status, _)| *status)
    }

    /// Whether a status has been committed.
    pub fn is_committed(&self) -> bool {
        self.head.is_some()
    }

    /// The headers the client will see: the snapshot taken at commit time,
    /// or the live map if nothing was committed yet.
    pub fn headers(&self) -> &HeaderMap {
        self.head.as_ref().map_or(&self.headers, |(_, headers)| headers)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers().get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_response(self) -> http::Response<Full<Bytes>> {
        let (status, headers) = self.head.unwrap_or((StatusCode::OK, self.headers));
        let mut response = http::Response::new(Full::new(self.body.freeze()));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

impl ResponseWriter for Recorder {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_header(&mut self, status: StatusCode) {
        if let Some((committed, _)) = &self.head {
            warn!(%committed, ignored = %status, "superfluous write_header call");
            return;
        }
        self.head = Some((status, self.headers.clone()));
    }

    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if self.head.is_none() {
            self.write_header(StatusCode::OK);
        }
        self.body.extend_from_slice(data);
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untouched_recorder_is_empty_ok() {
        let rec = Recorder::new();
        assert_eq!(rec.status(), StatusCode::OK);
        assert!(!rec.is_committed());
        assert!(rec.body().is_empty());
    }

    #[test]
    fn write_without_status_commits_ok() {
        let mut rec = Recorder::new();
        assert_eq!(rec.write(b"hello").unwrap(), 5);
        assert!(rec.is_committed());
        assert_eq!(rec.status(), StatusCode::OK);
        assert_eq!(rec.body(), b"hello");
    }

    #[test]
    fn first_status_wins() {
        let mut rec = Recorder::new();
        rec.write_header(StatusCode::CREATED);
        rec.write_header(StatusCode::NOT_FOUND);
        assert_eq!(rec.status(), StatusCode::CREATED);
    }

    #[test]
    fn headers_after_commit_are_not_sent() {
        let mut rec = Recorder::new();
        rec.headers_mut().insert("x-before", HeaderValue::from_static("1"));
        rec.write_header(StatusCode::OK);
        rec.headers_mut().insert("x-after", HeaderValue::from_static("1"));

        let response = rec.into_response();
        assert!(response.headers().contains_key("x-before"));
        assert!(!response.headers().contains_key("x-after"));
    }

    #[test]
    fn send_sets_content_type_status_and_body() {
        let mut rec = Recorder::new();
        rec.send(StatusCode::ACCEPTED, ContentType::Json, br#"{"ok":true}"#).unwrap();
        assert_eq!(rec.status(), StatusCode::ACCEPTED);
        assert_eq!(rec.header("content-type"), Some("application/json"));
        assert_eq!(rec.body(), br#"{"ok":true}"#);
    }
}
