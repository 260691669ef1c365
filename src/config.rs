//! Configuration for the bundled `share` binary.
//!
//! All types derive Serde traits for deserialization from TOML files;
//! every field has a default so a partial (or absent) file works.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings for serving a directory.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Bind address (e.g. "0.0.0.0:8080").
    pub bind_address: String,

    /// Directory to serve.
    pub root: PathBuf,

    /// Filename served when a directory is requested.
    pub index: Option<String>,

    /// List dotfiles in directory listings.
    pub show_hidden: bool,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            root: PathBuf::from("."),
            index: Some("index.html".to_string()),
            show_hidden: false,
            request_timeout_secs: 30,
        }
    }
}

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ShareConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: ShareConfig = toml::from_str(&content)?;
    Ok(config)
}
