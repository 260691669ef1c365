//! Access logging.
//!
//! Wraps a handler rather than sitting beside it in a stack, so it can
//! observe the response on the way out: one structured event per request
//! with method, path, status and elapsed time, plus `Date`, `Server` and
//! `X-Runtime` stamped onto handled responses.

use async_trait::async_trait;
use axum::http::header::{CONTENT_LENGTH, DATE, SERVER};
use std::time::{Instant, SystemTime};

use crate::error::Result;
use crate::http::Request;
use crate::pipeline::{Flow, Handler};

const SERVER_TOKEN: &str = concat!("stackware/", env!("CARGO_PKG_VERSION"));

/// A handler wrapped with access logging.
pub struct Logged {
    inner: Box<dyn Handler>,
}

impl Logged {
    pub fn new(inner: impl Handler + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }
}

#[async_trait]
impl Handler for Logged {
    async fn handle(&self, req: Request) -> Result<Flow> {
        let start = Instant::now();
        let method = req.method().clone();
        let url = req.url();
        let request_id = req.id().to_string();

        match self.inner.handle(req).await {
            Ok(Flow::Handled(mut res)) => {
                let elapsed_ms = start.elapsed().as_millis();
                if !res.headers().contains_key(DATE) {
                    res = res.header(DATE, httpdate::fmt_http_date(SystemTime::now()));
                }
                res = res
                    .header(SERVER, SERVER_TOKEN)
                    .header("x-runtime", elapsed_ms.to_string());
                tracing::info!(
                    request_id = %request_id,
                    method = %method,
                    url = %url,
                    status = res.status().as_u16(),
                    content_length = res.header_str(CONTENT_LENGTH.as_str()).unwrap_or("-"),
                    elapsed_ms = elapsed_ms as u64,
                    "request handled"
                );
                Ok(Flow::Handled(res))
            }
            Ok(Flow::Pass(req)) => {
                tracing::debug!(
                    request_id = %request_id,
                    method = %method,
                    url = %url,
                    "request not handled here"
                );
                Ok(Flow::Pass(req))
            }
            Err(err) => {
                tracing::error!(
                    request_id = %request_id,
                    method = %method,
                    url = %url,
                    error = %err,
                    "request failed"
                );
                Err(err)
            }
        }
    }
}
