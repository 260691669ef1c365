//! Embeddable HTTP middleware toolkit.
//!
//! Everything is a [`Handler`]: a unit of request processing that answers,
//! delegates, or fails. [`Stack`] composes handlers in order, [`Mount`]
//! scopes one under a URL prefix, and the rest of the crate is handlers:
//! static files, directory listings, uploads, deletes, Basic Auth, virtual
//! hosts, a path-parameter router, a webhook runner, and a script bundler.
//!
//! ```no_run
//! use stackware::{DirIndex, Logged, Server, Stack, StaticFiles};
//!
//! # async fn demo() -> Result<(), std::io::Error> {
//! let pipeline = Logged::new(
//!     Stack::new()
//!         .layer(StaticFiles::new("/", "./public").with_index("index.html"))
//!         .layer(DirIndex::new("/", "./public")),
//! );
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! Server::new(pipeline).run(listener).await
//! # }
//! ```

// Core pipeline
pub mod error;
pub mod http;
pub mod pipeline;
pub mod routing;

// Handlers
pub mod autoload;
pub mod files;
pub mod hooks;
pub mod middleware;

// Cross-cutting concerns
pub mod config;
pub mod observability;

pub use autoload::Autoload;
pub use error::{Error, Result};
pub use files::{Deleter, DirIndex, StaticFiles, Uploader};
pub use hooks::PostReceive;
pub use http::{Body, Request, Response, Server};
pub use middleware::{BasicAuth, Logged, VHost};
pub use pipeline::{handler_fn, Flow, Handler, Mount, Stack};
pub use routing::{Params, Route};
