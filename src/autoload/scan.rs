//! Static dependency scan.
//!
//! Module sources declare dependencies with `require('name')` /
//! `require("name")` call expressions whose argument is a single string
//! literal. The scan is textual and runs over the raw source in one pass;
//! dependency names are string-literal-only by contract, so there is
//! nothing dynamic to evaluate.

/// Collect dependency names in document order. Malformed call sites
/// (no quote, empty name, missing closing paren) are skipped.
pub(crate) fn scan_requires(source: &str) -> Vec<String> {
    const NEEDLE: &str = "require(";

    let mut found = Vec::new();
    let bytes = source.as_bytes();
    let mut at = 0;

    while let Some(pos) = source[at..].find(NEEDLE) {
        let open = at + pos + NEEDLE.len();
        at = open;
        let Some(&quote) = bytes.get(open) else { break };
        if quote != b'\'' && quote != b'"' {
            continue;
        }
        let name_start = open + 1;
        let Some(len) = source[name_start..].find(['\'', '"']) else {
            break;
        };
        let close = name_start + len;
        if len > 0 && bytes.get(close + 1) == Some(&b')') {
            found.push(source[name_start..close].to_string());
            at = close + 2;
        }
    }
    found
}
