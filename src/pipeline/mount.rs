use async_trait::async_trait;

use super::{Flow, Handler};
use crate::error::Result;
use crate::http::Request;

/// A handler scoped under a URL prefix.
///
/// Requests whose URL does not start with `<point>/` pass through
/// untouched. On a match the URL is rewritten relative to the mount point
/// for the duration of the inner handler, the original URL is recorded as
/// the request's `real_url`, and, when the inner handler declines, the
/// URL is restored verbatim (path and query re-derived) before the request
/// continues outward.
pub struct Mount {
    point: String,
    prefix: String,
    inner: Box<dyn Handler>,
}

impl Mount {
    /// `point` is the mount prefix, with or without a trailing slash.
    pub fn new(point: &str, inner: impl Handler + 'static) -> Self {
        let point = point.strip_suffix('/').unwrap_or(point).to_string();
        let prefix = format!("{point}/");
        Self {
            point,
            prefix,
            inner: Box::new(inner),
        }
    }
}

#[async_trait]
impl Handler for Mount {
    async fn handle(&self, mut req: Request) -> Result<Flow> {
        let url = req.url();
        if !url.starts_with(&self.prefix) {
            return Ok(Flow::Pass(req));
        }
        req.mark_real_url();
        req.set_url(&url[self.point.len()..]);
        match self.inner.handle(req).await? {
            Flow::Handled(res) => Ok(Flow::Handled(res)),
            Flow::Pass(mut back) => {
                back.set_url(&url);
                Ok(Flow::Pass(back))
            }
        }
    }
}
