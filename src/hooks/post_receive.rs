//! GitHub post-receive webhook runner.
//!
//! # Responsibilities
//! - Accept `POST` on the exact mount path, pass everything else through
//! - Best-effort decode the form-encoded `payload` field (advisory only;
//!   a broken payload never fails the hook)
//! - Run the configured script and hand its combined output back
//!
//! # Design Decisions
//! - The script runs with no arguments; exit status and output are the
//!   whole contract
//! - Output is mirrored to this process's stdout/stderr so hook runs show
//!   up in the host's own logs

use async_trait::async_trait;
use axum::http::header::CONTENT_LENGTH;
use axum::http::{Method, StatusCode};
use std::io::Write;
use std::path::PathBuf;
use tokio::process::Command;

use crate::error::{Error, Result};
use crate::http::{Request, Response};
use crate::pipeline::{Flow, Handler};

type SuccessHook = dyn Fn() + Send + Sync;

/// Runs `script` on webhook `POST`s to `mount`.
pub struct PostReceive {
    mount: String,
    script: PathBuf,
    on_success: Option<Box<SuccessHook>>,
}

impl PostReceive {
    pub fn new(mount: &str, script: impl Into<PathBuf>) -> Self {
        Self {
            mount: mount.to_string(),
            script: script.into(),
            on_success: None,
        }
    }

    /// Callback fired after the script has run successfully.
    pub fn on_success(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(hook));
        self
    }
}

#[async_trait]
impl Handler for PostReceive {
    async fn handle(&self, mut req: Request) -> Result<Flow> {
        if req.method() != Method::POST || req.path() != self.mount {
            return Ok(Flow::Pass(req));
        }

        let body = axum::body::to_bytes(req.take_body(), usize::MAX)
            .await
            .map_err(std::io::Error::other)?;

        // the payload is informational; a hook fires the same way whether
        // or not it parses
        let payload = url::form_urlencoded::parse(&body)
            .find(|(key, _)| key == "payload")
            .and_then(|(_, value)| serde_json::from_str::<serde_json::Value>(&value).ok())
            .unwrap_or_default();
        tracing::debug!(script = %self.script.display(), %payload, "post-receive hook");

        let script = self.script.display().to_string();
        let output = Command::new(&self.script)
            .output()
            .await
            .map_err(|e| Error::Hook {
                script: script.clone(),
                reason: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(Error::Hook {
                script,
                reason: format!("exit status {}", output.status),
            });
        }

        let _ = std::io::stdout().write_all(&output.stdout);
        let _ = std::io::stderr().write_all(&output.stderr);
        if let Some(hook) = &self.on_success {
            hook();
        }

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);
        Ok(Flow::Handled(
            Response::new(StatusCode::OK)
                .header(CONTENT_LENGTH, combined.len().to_string())
                .body(combined),
        ))
    }
}
