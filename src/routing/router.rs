//! Route dispatch.
//!
//! A [`Route`] binds an HTTP method and a compiled [`PathPattern`] to a
//! parameter-aware handler. Routes are built once at pipeline construction
//! and immutable afterwards; a non-matching request passes through.

use async_trait::async_trait;
use axum::http::Method;
use std::collections::HashMap;
use std::future::Future;

use super::matcher::PathPattern;
use crate::error::Result;
use crate::http::Request;
use crate::pipeline::{Flow, Handler};

/// Extracted path parameters, keyed by the `:name` in the pattern.
pub type Params = HashMap<String, String>;

/// A handler that also receives extracted path parameters.
#[async_trait]
pub trait RouteHandler: Send + Sync {
    async fn call(&self, req: Request, params: Params) -> Result<Flow>;
}

#[async_trait]
impl<F, Fut> RouteHandler for F
where
    F: Fn(Request, Params) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Flow>> + Send,
{
    async fn call(&self, req: Request, params: Params) -> Result<Flow> {
        (self)(req, params).await
    }
}

/// One method + pattern binding.
pub struct Route {
    method: Method,
    pattern: PathPattern,
    handler: Box<dyn RouteHandler>,
}

impl Route {
    pub fn new(method: Method, pattern: &str, handler: impl RouteHandler + 'static) -> Self {
        Self {
            method,
            pattern: PathPattern::compile(pattern),
            handler: Box::new(handler),
        }
    }
}

#[async_trait]
impl Handler for Route {
    async fn handle(&self, req: Request) -> Result<Flow> {
        if req.method() != self.method {
            return Ok(Flow::Pass(req));
        }
        let Some(captures) = self.pattern.matches(req.path()) else {
            return Ok(Flow::Pass(req));
        };
        let params: Params = captures
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        self.handler.call(req, params).await
    }
}
