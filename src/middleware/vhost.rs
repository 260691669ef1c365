//! Virtual-host dispatch.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::Result;
use crate::http::Request;
use crate::pipeline::{Flow, Handler};

/// Dispatches by the `Host` header (port suffix stripped, exact match).
/// No match goes to the fallback handler when one is set, otherwise the
/// request passes through.
#[derive(Default)]
pub struct VHost {
    hosts: HashMap<String, Box<dyn Handler>>,
    fallback: Option<Box<dyn Handler>>,
}

impl VHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to requests for `domain`.
    pub fn host(mut self, domain: &str, handler: impl Handler + 'static) -> Self {
        self.hosts.insert(domain.to_string(), Box::new(handler));
        self
    }

    /// Handler for requests no domain entry claims.
    pub fn fallback(mut self, handler: impl Handler + 'static) -> Self {
        self.fallback = Some(Box::new(handler));
        self
    }
}

#[async_trait]
impl Handler for VHost {
    async fn handle(&self, req: Request) -> Result<Flow> {
        let host = req
            .header("host")
            .map(|h| h.split_once(':').map_or(h, |(name, _)| name).to_string());

        if let Some(handler) = host.as_deref().and_then(|h| self.hosts.get(h)) {
            return handler.handle(req).await;
        }
        match &self.fallback {
            Some(handler) => handler.handle(req).await,
            None => Ok(Flow::Pass(req)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Response;
    use crate::pipeline::handler_fn;
    use axum::http::{Method, StatusCode};

    fn named(status: StatusCode) -> impl Handler {
        handler_fn(move |_req| async move { Ok(Flow::Handled(Response::new(status))) })
    }

    fn status_of(flow: Flow) -> StatusCode {
        match flow {
            Flow::Handled(res) => res.status(),
            Flow::Pass(_) => panic!("expected a response"),
        }
    }

    #[tokio::test]
    async fn dispatches_by_host_ignoring_port() {
        let vhost = VHost::new()
            .host("a.example", named(StatusCode::OK))
            .host("b.example", named(StatusCode::NO_CONTENT));

        let req = Request::new(Method::GET, "/").with_header("host", "b.example:8080");
        assert_eq!(
            status_of(vhost.handle(req).await.unwrap()),
            StatusCode::NO_CONTENT
        );
    }

    #[tokio::test]
    async fn unknown_host_uses_fallback() {
        let vhost = VHost::new()
            .host("a.example", named(StatusCode::OK))
            .fallback(named(StatusCode::IM_A_TEAPOT));

        let req = Request::new(Method::GET, "/").with_header("host", "nope.example");
        assert_eq!(
            status_of(vhost.handle(req).await.unwrap()),
            StatusCode::IM_A_TEAPOT
        );
    }

    #[tokio::test]
    async fn unknown_host_without_fallback_passes() {
        let vhost = VHost::new().host("a.example", named(StatusCode::OK));
        let req = Request::new(Method::GET, "/").with_header("host", "nope.example");
        assert!(matches!(vhost.handle(req).await.unwrap(), Flow::Pass(_)));
    }

    #[tokio::test]
    async fn missing_host_header_passes() {
        let vhost = VHost::new().host("a.example", named(StatusCode::OK));
        let req = Request::new(Method::GET, "/");
        assert!(matches!(vhost.handle(req).await.unwrap(), Flow::Pass(_)));
    }
}
