//! Pipeline error type.
//!
//! Handlers resolve requests in one of three ways: answer them, pass them
//! on, or fail with one of these errors. An `Err` short-circuits the
//! remaining handlers of the current stack and surfaces to whatever
//! error policy the host installed (the bundled transport adapter renders
//! a plain 500).

use thiserror::Error;

/// Errors a handler can propagate up the pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Unexpected filesystem or network failure (stat, read, write, unlink).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A hook script could not be spawned or exited non-zero.
    #[error("hook script `{script}` failed: {reason}")]
    Hook { script: String, reason: String },

    /// A module requested from the autoloader (directly or as a dependency)
    /// could not be read.
    #[error("module `{name}` could not be loaded")]
    Module {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The assembled bundle could not be minified.
    #[error("minify failed: {0}")]
    Minify(String),
}

pub type Result<T> = std::result::Result<T, Error>;
