//! In-browser module bundling.
//!
//! # Data Flow
//! ```text
//! GET <mount>?a,b
//!     → resolve a: read a.js → scan requires → resolve deps first → append a
//!     → resolve b: already seen? skip : same walk
//!     → bundle = bootstrap runtime + define(...) per module, in order
//!     → optional minify → 200 application/javascript
//! ```
//!
//! # Design Decisions
//! - Resolution is sequential depth-first with one file read in flight;
//!   a module is marked visited on entry, so diamonds dedupe and cycles
//!   terminate, and dependencies always precede their dependents
//! - Resolution state lives for one request; there is no cross-request
//!   cache
//! - A missing module file, requested or transitive, fails the whole
//!   bundle as a pipeline error instead of silently thinning it

mod minify;
mod scan;

use async_trait::async_trait;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::StatusCode;
use futures_util::future::BoxFuture;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::http::{Request, Response};
use crate::pipeline::{Flow, Handler};

const BOOTSTRAP: &str = include_str!("bootstrap.js");

/// Bundles `<folder>/<name>.js` modules for requests to exactly `mount`
/// whose query is a comma-separated module list.
pub struct Autoload {
    mount: String,
    folder: PathBuf,
    minify: bool,
}

/// Per-request resolution state.
#[derive(Default)]
struct Resolution {
    visited: HashSet<String>,
    modules: Vec<(String, String)>,
}

impl Autoload {
    pub fn new(mount: &str, folder: impl Into<PathBuf>) -> Self {
        Self {
            mount: mount.to_string(),
            folder: folder.into(),
            minify: false,
        }
    }

    /// Compress the assembled bundle before serving it.
    pub fn minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    /// Depth-first resolution: dependencies land in `state.modules` before
    /// the module that required them; repeat visits are no-ops.
    fn resolve<'a>(
        &'a self,
        state: &'a mut Resolution,
        name: String,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if !state.visited.insert(name.clone()) {
                return Ok(());
            }
            let path = self.folder.join(format!("{name}.js"));
            let source = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| Error::Module {
                    name: name.clone(),
                    source,
                })?;
            for dep in scan::scan_requires(&source) {
                self.resolve(state, dep).await?;
            }
            state.modules.push((name, source));
            Ok(())
        })
    }
}

#[async_trait]
impl Handler for Autoload {
    async fn handle(&self, req: Request) -> Result<Flow> {
        if req.path() != self.mount {
            return Ok(Flow::Pass(req));
        }
        let Some(query) = req.query() else {
            return Ok(Flow::Pass(req));
        };

        let names: Vec<String> = query
            .split(',')
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        let mut state = Resolution::default();
        for name in names {
            self.resolve(&mut state, name).await?;
        }

        let mut bundle = String::from(BOOTSTRAP);
        for (name, source) in &state.modules {
            bundle.push_str(&format!(
                "\ndefine('{name}', function (module, exports) {{\n\n{source}\n}})\n"
            ));
        }
        if self.minify {
            bundle = minify::minify(&bundle).map_err(Error::Minify)?;
        }

        Ok(Flow::Handled(
            Response::new(StatusCode::OK)
                .header(CONTENT_TYPE, "application/javascript")
                .header(CONTENT_LENGTH, bundle.len().to_string())
                .body(bundle),
        ))
    }
}
