//! Method + path-pattern routing.

pub mod matcher;
pub mod router;

pub use matcher::PathPattern;
pub use router::{Params, Route};
