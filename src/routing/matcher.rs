//! Route pattern compilation and matching.
//!
//! # Responsibilities
//! - Compile a pattern string with `:name` segments into tokens
//! - Match request paths against the compiled tokens, anchored at both ends
//! - Extract named parameters positionally
//!
//! # Design Decisions
//! - No regex: patterns compile to a flat literal/parameter token list and
//!   match in one left-to-right pass
//! - A parameter followed by a literal non-name character `c` matches one
//!   or more characters excluding `c`; a trailing bare parameter matches
//!   one or more characters excluding `/`, so `/users/:id` takes exactly
//!   one path segment

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    tokens: Vec<Token>,
}

#[derive(Debug, Clone)]
enum Token {
    Literal(String),
    Param {
        name: String,
        terminator: Option<char>,
    },
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '$' || c == '_'
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '$' || c == '_'
}

impl PathPattern {
    /// Compile `pattern`. `:name` introduces a parameter; any directly
    /// following non-name character becomes its terminator.
    pub fn compile(pattern: &str) -> Self {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            if c != ':' || !chars.peek().copied().is_some_and(is_name_start) {
                literal.push(c);
                continue;
            }
            if !literal.is_empty() {
                tokens.push(Token::Literal(std::mem::take(&mut literal)));
            }
            let mut name = String::new();
            while chars.peek().copied().is_some_and(is_name_char) {
                name.push(chars.next().expect("peeked"));
            }
            let terminator = chars.next_if(|c| !is_name_char(*c));
            tokens.push(Token::Param { name, terminator });
        }
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Self {
            source: pattern.to_string(),
            tokens,
        }
    }

    /// The original pattern string.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parameter names in pattern order.
    pub fn names(&self) -> Vec<&str> {
        self.tokens
            .iter()
            .filter_map(|t| match t {
                Token::Param { name, .. } => Some(name.as_str()),
                Token::Literal(_) => None,
            })
            .collect()
    }

    /// Match `path` against the whole pattern; on success, returns the
    /// captured parameters in pattern order.
    pub fn matches<'p>(&self, path: &'p str) -> Option<Vec<(&str, &'p str)>> {
        let mut rest = path;
        let mut captures = Vec::new();

        for token in &self.tokens {
            match token {
                Token::Literal(lit) => {
                    rest = rest.strip_prefix(lit.as_str())?;
                }
                Token::Param {
                    name,
                    terminator: Some(t),
                } => {
                    let at = rest.find(*t)?;
                    if at == 0 {
                        return None;
                    }
                    captures.push((name.as_str(), &rest[..at]));
                    rest = &rest[at + t.len_utf8()..];
                }
                Token::Param {
                    name,
                    terminator: None,
                } => {
                    if rest.is_empty() || rest.contains('/') {
                        return None;
                    }
                    captures.push((name.as_str(), rest));
                    rest = "";
                }
            }
        }

        rest.is_empty().then_some(captures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture<'p>(pattern: &str, path: &'p str) -> Option<Vec<(String, &'p str)>> {
        PathPattern::compile(pattern)
            .matches(path)
            .map(|caps| caps.into_iter().map(|(n, v)| (n.to_string(), v)).collect())
    }

    #[test]
    fn single_segment_parameter() {
        assert_eq!(
            capture("/users/:id", "/users/42"),
            Some(vec![("id".into(), "42")])
        );
        assert_eq!(capture("/users/:id", "/users/42/x"), None);
        assert_eq!(capture("/users/:id", "/users/"), None);
    }

    #[test]
    fn terminated_parameter_excludes_terminator() {
        assert_eq!(
            capture("/:year/:month/rest", "/2012/03/rest"),
            Some(vec![("year".into(), "2012"), ("month".into(), "03")])
        );
        assert_eq!(capture("/:year/rest", "//rest"), None);
    }

    #[test]
    fn dot_terminator() {
        assert_eq!(
            capture("/file/:name.json", "/file/report.json"),
            Some(vec![("name".into(), "report")])
        );
        // the first dot ends the capture; the remainder must match literally
        assert_eq!(capture("/file/:name.json", "/file/a.b.json"), None);
    }

    #[test]
    fn anchored_at_both_ends() {
        assert_eq!(capture("/a/:x/b", "/a/1/b/c"), None);
        assert_eq!(capture("/a/:x/b", "prefix/a/1/b"), None);
    }

    #[test]
    fn literal_only_pattern() {
        assert_eq!(capture("/ping", "/ping"), Some(vec![]));
        assert_eq!(capture("/ping", "/pong"), None);
    }

    #[test]
    fn names_in_order() {
        let pattern = PathPattern::compile("/:a/:b/tail/:c");
        assert_eq!(pattern.names(), ["a", "b", "c"]);
    }

    #[test]
    fn colon_without_name_is_literal() {
        assert_eq!(capture("/a/:/b", "/a/:/b"), Some(vec![]));
    }
}
