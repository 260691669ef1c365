//! Outbound response representation.
//!
//! # Responsibilities
//! - Carry status, headers and body from the handler that answered back to
//!   the transport
//! - Enforce the write-once discipline by construction: a `Response` is
//!   built, returned, and converted; headers cannot change after the body
//!   starts flowing because the whole value has already left the handler
//!
//! # Design Decisions
//! - Bodies are `axum::body::Body`: empty, buffered, or a byte stream;
//!   file-backed responses stream in chunks rather than buffering
//! - Handlers set `Content-Length` explicitly; nothing here infers it

use axum::body::Body;
use axum::http::header::IntoHeaderName;
use axum::http::{HeaderMap, HeaderValue, StatusCode};

/// One outbound HTTP response.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Body,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Body::empty(),
        }
    }

    /// Set a header. Values that are not legal header text are dropped
    /// rather than panicking; every value this crate generates is ASCII.
    pub fn header(mut self, name: impl IntoHeaderName, value: impl AsRef<str>) -> Self {
        if let Ok(v) = HeaderValue::from_str(value.as_ref()) {
            self.headers.insert(name, v);
        }
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Header value as a string, `None` if absent.
    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn into_parts(self) -> (StatusCode, HeaderMap, Body) {
        (self.status, self.headers, self.body)
    }

    pub fn into_http(self) -> axum::response::Response {
        let mut res = axum::response::Response::new(self.body);
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}
