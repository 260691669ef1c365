//! Inbound request representation.
//!
//! # Responsibilities
//! - Carry method, URL (path + query, split once at construction), headers
//!   and the streaming body through the pipeline
//! - Hold explicit per-request context instead of ad-hoc request
//!   decoration: the pre-rewrite URL recorded by mounts, the identity
//!   attached by auth, the transport-level `secure` flag
//! - Generate a request id for log correlation
//!
//! # Design Decisions
//! - Requests are owned values handed from handler to handler; a handler
//!   that passes gives the request back, so there is no shared mutation
//! - The path is stored in its raw (still percent-encoded) form; handlers
//!   that touch the filesystem decode it themselves

use axum::body::Body;
use axum::http::{HeaderMap, Method};
use uuid::Uuid;

/// One inbound HTTP request plus its pipeline context.
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Body,
    id: String,
    secure: bool,
    real_url: Option<String>,
    remote_user: Option<String>,
}

impl Request {
    /// Build a request from a method and a URL string (`/path` or
    /// `/path?query`). Used directly by tests and embedders.
    pub fn new(method: Method, url: &str) -> Self {
        let (path, query) = split_url(url);
        Self {
            method,
            path,
            query,
            headers: HeaderMap::new(),
            body: Body::empty(),
            id: Uuid::new_v4().to_string(),
            secure: false,
            real_url: None,
            remote_user: None,
        }
    }

    /// Convert a transport-level request. `secure` reports whether the
    /// connection was encrypted upstream.
    pub fn from_http(req: axum::extract::Request, secure: bool) -> Self {
        let (parts, body) = req.into_parts();
        let path = parts.uri.path().to_string();
        let query = parts.uri.query().map(str::to_string);
        Self {
            method: parts.method,
            path,
            query,
            headers: parts.headers,
            body,
            id: Uuid::new_v4().to_string(),
            secure,
            real_url: None,
            remote_user: None,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Raw (still percent-encoded) path component.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query string, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Current URL as a single string, `path[?query]`.
    pub fn url(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{}", self.path, q),
            None => self.path.clone(),
        }
    }

    /// Rewrite the URL in place, re-deriving path and query. Used by
    /// mounts to scope a sub-pipeline under a prefix.
    pub fn set_url(&mut self, url: &str) {
        let (path, query) = split_url(url);
        self.path = path;
        self.query = query;
    }

    /// The URL as the client sent it, before any mount rewrites.
    pub fn real_url(&self) -> String {
        self.real_url.clone().unwrap_or_else(|| self.url())
    }

    /// Record the pre-rewrite URL. Only the first (outermost) mount wins.
    pub fn mark_real_url(&mut self) {
        if self.real_url.is_none() {
            self.real_url = Some(self.url());
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Header value as a string, `None` if absent or not valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(v) = axum::http::HeaderValue::from_str(value) {
            self.headers.insert(name, v);
        }
        self
    }

    /// Whether the connection was encrypted upstream of this process.
    pub fn secure(&self) -> bool {
        self.secure
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Identity attached by an auth gate, if any handler upstream did so.
    pub fn remote_user(&self) -> Option<&str> {
        self.remote_user.as_deref()
    }

    pub fn set_remote_user(&mut self, user: String) {
        self.remote_user = Some(user);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Take ownership of the body stream, leaving an empty one behind.
    /// Terminal handlers that consume the body (upload, webhooks) call this
    /// exactly once.
    pub fn take_body(&mut self) -> Body {
        std::mem::replace(&mut self.body, Body::empty())
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }
}

fn split_url(url: &str) -> (String, Option<String>) {
    match url.split_once('?') {
        Some((path, query)) => (path.to_string(), Some(query.to_string())),
        None => (url.to_string(), None),
    }
}
