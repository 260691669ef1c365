//! HTML directory listings.
//!
//! Sits after [`StaticFiles`](super::StaticFiles) in a stack: static
//! declines directories (when no index file is configured), the indexer
//! picks them up. Non-directories pass through.

use async_trait::async_trait;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::StatusCode;
use futures_util::future::join_all;
use std::path::PathBuf;

use crate::error::Result;
use crate::files;
use crate::http::{Request, Response};
use crate::pipeline::{Flow, Handler};

/// Renders a listing for directories under `root`, scoped to `mount`.
pub struct DirIndex {
    mount: String,
    root: PathBuf,
    show_hidden: bool,
}

/// One listing row. Directories get a `/` suffix, files a MIME type;
/// entries whose stat failed keep their bare name and get neither.
struct Entry {
    name: String,
    hidden: bool,
    mime: Option<String>,
}

impl DirIndex {
    pub fn new(mount: &str, root: impl Into<PathBuf>) -> Self {
        Self {
            mount: mount.to_string(),
            root: root.into(),
            show_hidden: false,
        }
    }

    /// List dotfiles too instead of hiding them with CSS.
    pub fn show_hidden(mut self, show: bool) -> Self {
        self.show_hidden = show;
        self
    }
}

#[async_trait]
impl Handler for DirIndex {
    async fn handle(&self, req: Request) -> Result<Flow> {
        let Some(path) = files::resolve(&self.mount, &self.root, req.path()) else {
            return Ok(Flow::Pass(req));
        };

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Ok(Flow::Pass(req)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Flow::Pass(req))
            }
            Err(e) => return Err(e.into()),
        }

        let mut names = Vec::new();
        let mut dir = tokio::fs::read_dir(&path).await?;
        while let Some(entry) = dir.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        if path != self.root {
            names.push("..".to_string());
        }
        names.sort();

        // stat every entry concurrently, render once all have returned
        let stats = join_all(
            names
                .iter()
                .map(|name| tokio::fs::metadata(path.join(name))),
        )
        .await;

        let entries: Vec<Entry> = names
            .into_iter()
            .zip(stats)
            .map(|(name, stat)| {
                let parent = name == "..";
                let hidden = name.starts_with('.') && !parent;
                match stat {
                    Ok(meta) if meta.is_dir() => Entry {
                        name: format!("{name}/"),
                        hidden,
                        mime: None,
                    },
                    Ok(_) => {
                        let mime = mime_guess::from_path(&name)
                            .first_or_octet_stream()
                            .to_string();
                        Entry {
                            name,
                            hidden,
                            mime: Some(mime),
                        }
                    }
                    Err(_) => Entry {
                        name,
                        hidden,
                        mime: None,
                    },
                }
            })
            .collect();

        let html = render(&path.display().to_string(), &entries, self.show_hidden);
        Ok(Flow::Handled(
            Response::new(StatusCode::OK)
                .header(CONTENT_TYPE, "text/html")
                .header(CONTENT_LENGTH, html.len().to_string())
                .body(html),
        ))
    }
}

fn render(title: &str, entries: &[Entry], show_hidden: bool) -> String {
    let items: Vec<String> = entries
        .iter()
        .map(|entry| {
            let class = if entry.hidden { " class=\"hidden\"" } else { "" };
            let name = escape(&entry.name);
            let mime = entry
                .mime
                .as_deref()
                .map(|m| format!(" title=\"{}\"", escape(m)))
                .unwrap_or_default();
            format!("<li{class}><a href=\"{name}\"{mime}>{name}</a></li>")
        })
        .collect();
    let mut html = String::new();
    if !show_hidden {
        html.push_str("<style>.hidden{display:none;}</style>\n");
    }
    html.push_str(&format!("<h1>{}</h1>\n", escape(title)));
    html.push_str(&format!("<ul>{}</ul>", items.join("\n")));
    html
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('>', "&gt;")
        .replace('<', "&lt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_html_metacharacters() {
        assert_eq!(escape("a&<b>"), "a&amp;&lt;b&gt;");
    }

    #[test]
    fn hidden_entries_get_the_css_class() {
        let entries = vec![
            Entry {
                name: "../".into(),
                hidden: false,
                mime: None,
            },
            Entry {
                name: ".git/".into(),
                hidden: true,
                mime: None,
            },
            Entry {
                name: "readme.md".into(),
                hidden: false,
                mime: Some("text/markdown".into()),
            },
        ];
        let html = render("/srv", &entries, false);
        assert!(html.contains("<style>"));
        assert!(html.contains("<li class=\"hidden\"><a href=\".git/\">.git/</a></li>"));
        assert!(html.contains("<li><a href=\"../\">../</a></li>"));
        assert!(html.contains(
            "<li><a href=\"readme.md\" title=\"text/markdown\">readme.md</a></li>"
        ));
    }

    #[test]
    fn show_hidden_drops_the_style_block() {
        let html = render("/srv", &[], true);
        assert!(!html.contains("<style>"));
    }
}
