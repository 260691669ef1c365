//! DELETE handler.

use async_trait::async_trait;
use axum::http::header::CONTENT_LENGTH;
use axum::http::{Method, StatusCode};
use std::path::PathBuf;

use crate::error::Result;
use crate::files;
use crate::http::{Request, Response};
use crate::pipeline::{Flow, Handler};

/// Unlinks files under `root` for `DELETE` requests below `mount`.
/// A missing file is "not found here" and passes through; any other
/// unlink failure is a pipeline error.
pub struct Deleter {
    mount: String,
    root: PathBuf,
}

impl Deleter {
    pub fn new(mount: &str, root: impl Into<PathBuf>) -> Self {
        Self {
            mount: mount.to_string(),
            root: root.into(),
        }
    }
}

#[async_trait]
impl Handler for Deleter {
    async fn handle(&self, req: Request) -> Result<Flow> {
        if req.method() != Method::DELETE {
            return Ok(Flow::Pass(req));
        }
        let Some(path) = files::resolve(&self.mount, &self.root, req.path()) else {
            return Ok(Flow::Pass(req));
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(Flow::Handled(
                Response::new(StatusCode::OK).header(CONTENT_LENGTH, "0"),
            )),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Flow::Pass(req)),
            Err(e) => Err(e.into()),
        }
    }
}
