//! Shared utilities for integration testing.

use axum::http::Method;
use stackware::{Flow, Request, Response};

/// Build a GET request for `url`.
pub fn get(url: &str) -> Request {
    Request::new(Method::GET, url)
}

/// Unwrap a handled response; panics if the handler passed.
pub fn handled(flow: Flow) -> Response {
    match flow {
        Flow::Handled(res) => res,
        Flow::Pass(req) => panic!("expected a response, request {} passed through", req.url()),
    }
}

/// Assert the handler passed the request on.
#[allow(dead_code)]
pub fn passed(flow: Flow) -> Request {
    match flow {
        Flow::Pass(req) => req,
        Flow::Handled(res) => panic!("expected pass-through, got status {}", res.status()),
    }
}

/// Read a response body to a string.
pub async fn body_string(res: Response) -> String {
    let (_, _, body) = res.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("body read");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// Read a response body to bytes.
#[allow(dead_code)]
pub async fn body_bytes(res: Response) -> Vec<u8> {
    let (_, _, body) = res.into_parts();
    axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("body read")
        .to_vec()
}
