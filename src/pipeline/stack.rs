use async_trait::async_trait;

use super::{Flow, Handler};
use crate::error::Result;
use crate::http::Request;

/// An ordered composition of handlers, itself a handler.
///
/// Handlers run strictly in registration order. A handler that answers
/// terminates the walk; one that fails skips everything after it. Falling
/// off the end delegates to whatever encloses the stack (the terminal
/// "not handled here" outcome).
#[derive(Default)]
pub struct Stack {
    layers: Vec<Box<dyn Handler>>,
}

impl Stack {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Append a handler. Order of calls is order of execution.
    pub fn layer(mut self, handler: impl Handler + 'static) -> Self {
        self.layers.push(Box::new(handler));
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[async_trait]
impl Handler for Stack {
    async fn handle(&self, mut req: Request) -> Result<Flow> {
        for layer in &self.layers {
            match layer.handle(req).await? {
                Flow::Handled(res) => return Ok(Flow::Handled(res)),
                Flow::Pass(back) => req = back,
            }
        }
        Ok(Flow::Pass(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::http::Response;
    use crate::pipeline::handler_fn;
    use axum::http::{Method, StatusCode};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn tag(order: Arc<std::sync::Mutex<Vec<&'static str>>>, name: &'static str) -> impl Fn() {
        move || order.lock().unwrap().push(name)
    }

    #[tokio::test]
    async fn runs_handlers_in_registration_order() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let first = tag(order.clone(), "first");
        let second = tag(order.clone(), "second");
        let stack = Stack::new()
            .layer(handler_fn(move |req| {
                first();
                async move { Ok(Flow::Pass(req)) }
            }))
            .layer(handler_fn(move |req| {
                second();
                async move { Ok(Flow::Pass(req)) }
            }));

        let flow = stack.handle(Request::new(Method::GET, "/")).await.unwrap();
        assert!(matches!(flow, Flow::Pass(_)));
        assert_eq!(*order.lock().unwrap(), ["first", "second"]);
    }

    #[tokio::test]
    async fn answering_stops_the_walk() {
        let reached = Arc::new(AtomicUsize::new(0));
        let counter = reached.clone();
        let stack = Stack::new()
            .layer(handler_fn(|_req| async {
                Ok(Flow::Handled(Response::new(StatusCode::OK)))
            }))
            .layer(handler_fn(move |req| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok(Flow::Pass(req)) }
            }));

        let flow = stack.handle(Request::new(Method::GET, "/")).await.unwrap();
        assert!(matches!(flow, Flow::Handled(_)));
        assert_eq!(reached.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn error_skips_remaining_handlers() {
        let reached = Arc::new(AtomicUsize::new(0));
        let counter = reached.clone();
        let stack = Stack::new()
            .layer(handler_fn(|_req| async {
                Err(Error::Io(std::io::Error::other("boom")))
            }))
            .layer(handler_fn(move |req| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok(Flow::Pass(req)) }
            }));

        let err = stack.handle(Request::new(Method::GET, "/")).await;
        assert!(err.is_err());
        assert_eq!(reached.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_stack_passes_through() {
        let stack = Stack::new();
        let flow = stack.handle(Request::new(Method::GET, "/x")).await.unwrap();
        match flow {
            Flow::Pass(req) => assert_eq!(req.path(), "/x"),
            Flow::Handled(_) => panic!("empty stack must not answer"),
        }
    }
}
