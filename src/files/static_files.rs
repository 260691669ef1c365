//! Static file serving.
//!
//! # Responsibilities
//! - Serve regular files under a root, scoped to a mount prefix
//! - Conditional GET: `Last-Modified` / `If-Modified-Since` → `304`
//! - Partial content: `Range: bytes=<start>-<end>` → `206` / `416`
//! - MIME resolution by extension with an octet-stream fallback
//!
//! # Design Decisions
//! - `ENOENT` passes through so a later handler (or the host's 404 policy)
//!   decides; only unexpected stat/read failures become pipeline errors
//! - Directories pass through unless an index filename is configured, in
//!   which case resolution recurses into `<dir>/<index>`
//! - Bodies stream in 64 KiB chunks; `Content-Length` is always the exact
//!   byte count of the selected range

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::header::{
    CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, DATE, LAST_MODIFIED,
};
use axum::http::{Method, StatusCode};
use futures_util::stream;
use std::io::SeekFrom;
use std::path::PathBuf;
use std::time::SystemTime;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::error::Result;
use crate::files;
use crate::http::{Request, Response};
use crate::pipeline::{Flow, Handler};

const CHUNK_SIZE: u64 = 64 * 1024;

/// Serves files under `root` for `GET` requests below `mount`.
pub struct StaticFiles {
    mount: String,
    root: PathBuf,
    index: Option<String>,
}

impl StaticFiles {
    pub fn new(mount: &str, root: impl Into<PathBuf>) -> Self {
        Self {
            mount: mount.to_string(),
            root: root.into(),
            index: None,
        }
    }

    /// Filename to serve when the resolved path is a directory
    /// (e.g. `index.html`).
    pub fn with_index(mut self, index: &str) -> Self {
        self.index = Some(index.to_string());
        self
    }
}

#[async_trait]
impl Handler for StaticFiles {
    async fn handle(&self, req: Request) -> Result<Flow> {
        if req.method() != Method::GET {
            return Ok(Flow::Pass(req));
        }
        let Some(mut path) = files::resolve(&self.mount, &self.root, req.path()) else {
            return Ok(Flow::Pass(req));
        };

        let meta = loop {
            match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.is_dir() => match &self.index {
                    Some(index) => path = path.join(index),
                    None => return Ok(Flow::Pass(req)),
                },
                Ok(meta) if meta.is_file() => break meta,
                // neither file nor directory (socket, fifo, ...)
                Ok(_) => return Ok(Flow::Pass(req)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Ok(Flow::Pass(req))
                }
                Err(e) => return Err(e.into()),
            }
        };

        let last_modified = httpdate::fmt_http_date(meta.modified()?);
        let base = |status: StatusCode| {
            Response::new(status)
                .header(DATE, httpdate::fmt_http_date(SystemTime::now()))
                .header(LAST_MODIFIED, &last_modified)
        };

        if req.header("if-modified-since") == Some(last_modified.as_str()) {
            return Ok(Flow::Handled(base(StatusCode::NOT_MODIFIED)));
        }

        let size = meta.len() as i64;
        let mut start: i64 = 0;
        let mut end: i64 = size - 1;
        let mut status = StatusCode::OK;
        let mut content_range = None;

        if let Some(spec) = req.header("range").and_then(parse_range) {
            let (s, e) = spec.bounds(size);
            if e < s || s < 0 || e >= size {
                return Ok(Flow::Handled(base(StatusCode::RANGE_NOT_SATISFIABLE)));
            }
            start = s;
            end = e;
            status = StatusCode::PARTIAL_CONTENT;
            content_range = Some(format!("bytes {start}-{end}/{size}"));
        }

        let len = end - start + 1;
        let mut res = base(status)
            .header(CONTENT_LENGTH, len.to_string())
            .header(
                CONTENT_TYPE,
                mime_guess::from_path(&path)
                    .first_or_octet_stream()
                    .as_ref(),
            );
        if let Some(range) = content_range {
            res = res.header(CONTENT_RANGE, range);
        }
        if len == 0 {
            return Ok(Flow::Handled(res));
        }

        let mut file = File::open(&path).await?;
        if start > 0 {
            file.seek(SeekFrom::Start(start as u64)).await?;
        }
        Ok(Flow::Handled(res.body(file_body(file, len as u64))))
    }
}

/// Stream `len` bytes from `file` in fixed-size chunks.
fn file_body(file: File, len: u64) -> Body {
    let chunks = stream::try_unfold((file, len), |(mut file, remaining)| async move {
        if remaining == 0 {
            return Ok::<_, std::io::Error>(None);
        }
        let mut buf = vec![0u8; remaining.min(CHUNK_SIZE) as usize];
        let n = file.read(&mut buf).await?;
        if n == 0 {
            // file shrank under us; end the stream
            return Ok(None);
        }
        buf.truncate(n);
        Ok(Some((Bytes::from(buf), (file, remaining - n as u64))))
    });
    Body::from_stream(chunks)
}

/// A parsed `bytes=` range before validation against the file size.
#[derive(Debug, PartialEq)]
enum RangeSpec {
    /// `bytes=a-b` / `bytes=a-` (open end) / `bytes=-` (whole file).
    FromTo(Option<i64>, Option<i64>),
    /// `bytes=-n`: the last `n` bytes.
    Suffix(i64),
}

impl RangeSpec {
    fn bounds(&self, size: i64) -> (i64, i64) {
        match *self {
            RangeSpec::FromTo(start, end) => {
                (start.unwrap_or(0), end.unwrap_or(size - 1))
            }
            RangeSpec::Suffix(n) => (size - n, size - 1),
        }
    }
}

/// Parse a `Range` header value. `None` means the header is malformed and
/// gets ignored (the whole file is served); satisfiability is the caller's
/// check.
fn parse_range(value: &str) -> Option<RangeSpec> {
    let spec = value.strip_prefix("bytes=")?;
    let (a, b) = spec.split_once('-')?;
    let parse = |s: &str| -> Option<Option<i64>> {
        if s.is_empty() {
            Some(None)
        } else {
            s.parse::<i64>().ok().map(Some)
        }
    };
    match (parse(a)?, parse(b)?) {
        (None, Some(n)) => Some(RangeSpec::Suffix(n)),
        (start, end) => Some(RangeSpec::FromTo(start, end)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_closed_range() {
        assert_eq!(
            parse_range("bytes=0-99"),
            Some(RangeSpec::FromTo(Some(0), Some(99)))
        );
    }

    #[test]
    fn parses_open_and_suffix_ranges() {
        assert_eq!(
            parse_range("bytes=100-"),
            Some(RangeSpec::FromTo(Some(100), None))
        );
        assert_eq!(parse_range("bytes=-50"), Some(RangeSpec::Suffix(50)));
        assert_eq!(parse_range("bytes=-"), Some(RangeSpec::FromTo(None, None)));
    }

    #[test]
    fn malformed_ranges_are_ignored() {
        assert_eq!(parse_range("bytes=abc-def"), None);
        assert_eq!(parse_range("chunks=0-5"), None);
        assert_eq!(parse_range("bytes=5"), None);
    }

    #[test]
    fn suffix_longer_than_file_goes_negative() {
        let (start, end) = RangeSpec::Suffix(100).bounds(10);
        assert!(start < 0);
        assert_eq!(end, 9);
    }

    #[test]
    fn open_end_covers_to_eof() {
        assert_eq!(RangeSpec::FromTo(Some(3), None).bounds(10), (3, 9));
        assert_eq!(RangeSpec::FromTo(None, None).bounds(10), (0, 9));
    }
}
