//! HTTP types and transport glue.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, timeout/trace layers)
//!     → request.rs (toolkit Request: URL split, context fields)
//!     → [installed pipeline answers, passes, or fails]
//!     → response.rs (status/headers/body back to the transport)
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use axum::body::Body;
pub use request::Request;
pub use response::Response;
pub use server::Server;
