//! Conservative JavaScript size reduction.
//!
//! Two string-aware passes: strip `/* */` and `//` comments, then collapse
//! whitespace. Newlines survive as single newlines so automatic semicolon
//! insertion is never disturbed; anything inside a string or template
//! literal is copied verbatim. When in doubt the input is emitted
//! unchanged: a bigger bundle beats a broken one.

/// Minify `source`. Fails only on input the scanner cannot make sense of
/// (an unterminated block comment).
pub(crate) fn minify(source: &str) -> Result<String, String> {
    let stripped = strip_comments(source)?;
    Ok(collapse_whitespace(&stripped))
}

fn strip_comments(input: &str) -> Result<String, String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(quote) = in_string {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == quote {
                in_string = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => {
                in_string = Some(c);
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut closed = false;
                while let Some(inner) = chars.next() {
                    if inner == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err("unterminated block comment".to_string());
                }
            }
            _ => out.push(c),
        }
    }
    Ok(out)
}

fn collapse_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string: Option<char> = None;
    let mut pending_space = false;
    let mut pending_newline = false;

    while let Some(c) = chars.next() {
        if let Some(quote) = in_string {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == quote {
                in_string = None;
            }
            continue;
        }
        match c {
            '\n' | '\r' => {
                pending_newline = true;
                pending_space = false;
            }
            ' ' | '\t' => {
                if !pending_newline {
                    pending_space = true;
                }
            }
            _ => {
                if pending_newline && !out.is_empty() {
                    out.push('\n');
                }
                if pending_space && !out.is_empty() && !out.ends_with('\n') {
                    out.push(' ');
                }
                pending_newline = false;
                pending_space = false;
                if matches!(c, '"' | '\'' | '`') {
                    in_string = Some(c);
                }
                out.push(c);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_line_and_block_comments() {
        let src = "var a = 1; // tail\n/* gone */var b = 2;";
        assert_eq!(minify(src).unwrap(), "var a = 1;\nvar b = 2;");
    }

    #[test]
    fn comment_markers_inside_strings_survive() {
        let src = "var url = \"http://example.com\"; // real comment";
        assert_eq!(minify(src).unwrap(), "var url = \"http://example.com\";");
    }

    #[test]
    fn whitespace_collapses_but_newlines_remain() {
        let src = "var   a\t=  1;\n\n\n  var b = 2;";
        assert_eq!(minify(src).unwrap(), "var a = 1;\nvar b = 2;");
    }

    #[test]
    fn template_literals_keep_their_whitespace() {
        let src = "var t = `a   b\n\nc`;";
        assert_eq!(minify(src).unwrap(), src);
    }

    #[test]
    fn escaped_quotes_do_not_end_strings() {
        let src = "var s = 'it\\'s   fine'; //x";
        assert_eq!(minify(src).unwrap(), "var s = 'it\\'s   fine';");
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        assert!(minify("var a = 1; /* oops").is_err());
    }

    #[test]
    fn minification_is_deterministic() {
        let src = "function f() {\n  return   1; // one\n}";
        assert_eq!(minify(src).unwrap(), minify(src).unwrap());
    }
}
