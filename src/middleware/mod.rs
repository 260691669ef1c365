//! Cross-cutting middleware: auth gate, virtual hosts, access logging.

pub mod auth;
pub mod logger;
pub mod vhost;

pub use auth::BasicAuth;
pub use logger::Logged;
pub use vhost::VHost;
