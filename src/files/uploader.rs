//! PUT upload handler.

use async_trait::async_trait;
use axum::http::header::CONTENT_LENGTH;
use axum::http::{Method, StatusCode};
use futures_util::StreamExt;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::files;
use crate::http::{Request, Response};
use crate::pipeline::{Flow, Handler};

/// Writes `PUT` bodies to files under `root`, scoped to `mount`. The body
/// streams straight to disk; a clean end of stream answers `200`.
pub struct Uploader {
    mount: String,
    root: PathBuf,
}

impl Uploader {
    pub fn new(mount: &str, root: impl Into<PathBuf>) -> Self {
        Self {
            mount: mount.to_string(),
            root: root.into(),
        }
    }
}

#[async_trait]
impl Handler for Uploader {
    async fn handle(&self, mut req: Request) -> Result<Flow> {
        if req.method() != Method::PUT {
            return Ok(Flow::Pass(req));
        }
        let Some(path) = files::resolve(&self.mount, &self.root, req.path()) else {
            return Ok(Flow::Pass(req));
        };

        let mut file = tokio::fs::File::create(&path).await?;
        let mut body = req.take_body().into_data_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(std::io::Error::other)?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        Ok(Flow::Handled(
            Response::new(StatusCode::OK).header(CONTENT_LENGTH, "0"),
        ))
    }
}
