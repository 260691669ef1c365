//! Request-handling pipeline.
//!
//! # Data Flow
//! ```text
//! Request
//!     → Stack (handlers in registration order)
//!         → handler answers           → Flow::Handled(response)
//!         → handler delegates          → Flow::Pass(request) → next handler
//!         → handler fails              → Err(_) → remaining handlers skipped
//!     → Mount (URL-prefix-scoped sub-stack, rewrite/restore)
//! ```
//!
//! # Design Decisions
//! - Handlers own the request while they run; delegation hands it back, so
//!   short-circuiting and error propagation are plain control flow instead
//!   of nested continuations
//! - Composition is an explicit ordered list walked with a cursor; there is
//!   no hidden "last handler wins" nesting

mod mount;
mod stack;

pub use mount::Mount;
pub use stack::Stack;

use async_trait::async_trait;
use std::future::Future;

use crate::error::Result;
use crate::http::{Request, Response};

/// What a handler did with a request.
#[derive(Debug)]
pub enum Flow {
    /// The handler answered; the response goes back to the transport.
    Handled(Response),
    /// The handler declined; the request continues to the next handler.
    Pass(Request),
}

/// A unit of request processing: answer, delegate, or fail.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, req: Request) -> Result<Flow>;
}

#[async_trait]
impl<H: Handler + ?Sized> Handler for Box<H> {
    async fn handle(&self, req: Request) -> Result<Flow> {
        (**self).handle(req).await
    }
}

#[async_trait]
impl<H: Handler + ?Sized> Handler for std::sync::Arc<H> {
    async fn handle(&self, req: Request) -> Result<Flow> {
        (**self).handle(req).await
    }
}

/// Adapter turning an async closure into a [`Handler`].
pub struct HandlerFn<F>(F);

/// Wrap `f` as a pipeline handler.
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Flow>> + Send,
{
    HandlerFn(f)
}

#[async_trait]
impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Flow>> + Send,
{
    async fn handle(&self, req: Request) -> Result<Flow> {
        (self.0)(req).await
    }
}
