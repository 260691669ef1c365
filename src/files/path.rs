//! Mount-relative path resolution.
//!
//! One rule shared by every filesystem handler: percent-decode the request
//! path, collapse runs of two or more dots to a single dot (neutralizing
//! `..` escape attempts before the path ever reaches the filesystem),
//! require the mount prefix, and map the remainder under the root.

use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};

/// Map `raw_path` (still percent-encoded) under `root`, scoped to `mount`.
/// Returns `None` when the request is outside the mount: the handler's
/// pass-through case.
pub(crate) fn resolve(mount: &str, root: &Path, raw_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(raw_path).decode_utf8().ok()?;
    let cleaned = collapse_dots(&decoded);
    if cleaned.is_empty() || !cleaned.starts_with(mount) {
        return None;
    }
    let rel = cleaned[mount.len()..]
        .trim_start_matches('/')
        .trim_end_matches('/');
    Some(root.join(rel))
}

/// Replace every run of two or more dots with a single dot.
fn collapse_dots(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut dots = 0usize;
    for c in path.chars() {
        if c == '.' {
            dots += 1;
            continue;
        }
        if dots > 0 {
            out.push('.');
            dots = 0;
        }
        out.push(c);
    }
    if dots > 0 {
        out.push('.');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_under_root() {
        let path = resolve("/", Path::new("/srv/www"), "/a/b.txt").unwrap();
        assert_eq!(path, Path::new("/srv/www/a/b.txt"));
    }

    #[test]
    fn strips_mount_prefix() {
        let path = resolve("/assets", Path::new("/srv/www"), "/assets/app.css").unwrap();
        assert_eq!(path, Path::new("/srv/www/app.css"));
    }

    #[test]
    fn outside_mount_is_none() {
        assert!(resolve("/assets", Path::new("/srv/www"), "/other/x").is_none());
    }

    #[test]
    fn traversal_collapses_to_dots() {
        let path = resolve("/", Path::new("/srv/www"), "/../../etc/passwd").unwrap();
        assert_eq!(path, Path::new("/srv/www/././etc/passwd"));
    }

    #[test]
    fn encoded_traversal_is_also_neutralized() {
        let path = resolve("/", Path::new("/srv/www"), "/%2e%2e/etc/passwd").unwrap();
        assert_eq!(path, Path::new("/srv/www/./etc/passwd"));
    }

    #[test]
    fn single_dots_survive() {
        let path = resolve("/", Path::new("/srv"), "/notes.txt").unwrap();
        assert_eq!(path, Path::new("/srv/notes.txt"));
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let path = resolve("/", Path::new("/srv"), "/dir/").unwrap();
        assert_eq!(path, Path::new("/srv/dir"));
    }

    #[test]
    fn decodes_percent_escapes() {
        let path = resolve("/", Path::new("/srv"), "/hello%20world.txt").unwrap();
        assert_eq!(path, Path::new("/srv/hello world.txt"));
    }
}
