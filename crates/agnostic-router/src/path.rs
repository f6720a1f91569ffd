//! Path pattern matching.

use std::fmt::Write;
use std::str::FromStr;

use regex::Regex;

use crate::error::{Result, RouterError};
use crate::request::PathParams;

/// Matches an optional query string at the end of a path.
const QUERY_TAIL: &str = r"(?:\?.*)?$";

/// A compiled path pattern for matching URLs.
#[derive(Debug, Clone)]
pub struct PathPattern {
    /// The original template, or the regex source for precompiled patterns.
    pattern: String,
    /// Compiled regex for matching.
    regex: Regex,
    /// Parameter names in order.
    param_names: Vec<String>,
}

impl PathPattern {
    /// Compiles a path template.
    ///
    /// Template syntax:
    /// - `/users` - Literal path, with or without one trailing slash
    /// - `/users/` - Literal path, trailing slash optional
    /// - `/users/{id}` - Named parameter, one segment without `/` or `?`
    /// - `/files/*` - Prefix match on `/files` and everything below it
    ///
    /// Wildcard matching is segment-aware: `/users/*` accepts `/users`,
    /// `/users/1` and `/users?page=2` but not `/usersabc`, unlike a plain
    /// textual prefix match.
    ///
    /// A query string after the path is always tolerated and never captured.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidPattern`] for an unmatched brace, an
    /// invalid or duplicate parameter name, or a template that does not
    /// compile.
    ///
    /// # Example
    ///
    /// ```
    /// use agnostic_router::PathPattern;
    ///
    /// let pattern = PathPattern::new("/posts/{id}/comments/{comment_id}").unwrap();
    /// let params = pattern.match_path("/posts/123/comments/456?page=2").unwrap();
    /// assert_eq!(params.get("id"), Some("123"));
    /// assert_eq!(params.get("comment_id"), Some("456"));
    /// ```
    pub fn new(template: &str) -> Result<Self> {
        let invalid = |reason: &str| RouterError::InvalidPattern {
            pattern: template.to_string(),
            reason: reason.to_string(),
        };

        let (body, wildcard) = template
            .strip_suffix("/*")
            .map_or((template, false), |prefix| (prefix, true));

        let mut param_names: Vec<String> = Vec::new();
        let mut regex_str = String::from("^");
        let mut rest = body;

        while let Some(open) = rest.find(['{', '}']) {
            let (literal, tail) = rest.split_at(open);
            regex_str.push_str(&regex::escape(literal));

            if tail.starts_with('}') {
                return Err(invalid("unmatched '}'"));
            }
            let close = tail.find('}').ok_or_else(|| invalid("unclosed '{'"))?;
            let name = &tail[1..close];
            if !is_param_name(name) {
                return Err(invalid(&format!("invalid parameter name '{name}'")));
            }
            if param_names.iter().any(|n| n == name) {
                return Err(invalid(&format!("duplicate parameter name '{name}'")));
            }

            let _ = write!(regex_str, "(?P<{name}>[^/?]+)");
            param_names.push(name.to_string());
            rest = &tail[close + 1..];
        }
        regex_str.push_str(&regex::escape(rest));

        if wildcard {
            regex_str.push_str(r"(?:[/?].*)?$");
        } else if body.ends_with('/') {
            regex_str.push('?');
            regex_str.push_str(QUERY_TAIL);
        } else {
            regex_str.push_str("/?");
            regex_str.push_str(QUERY_TAIL);
        }

        let regex = Regex::new(&regex_str).map_err(|e| invalid(&e.to_string()))?;

        Ok(Self {
            pattern: template.to_string(),
            regex,
            param_names,
        })
    }

    /// Wraps a precompiled regex. Its named groups become path parameters.
    #[must_use]
    pub fn from_regex(regex: Regex) -> Self {
        let param_names = regex.capture_names().flatten().map(String::from).collect();
        Self {
            pattern: regex.as_str().to_string(),
            regex,
            param_names,
        }
    }

    /// Returns whether `path` is accepted by this pattern.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Attempts to match a path against this pattern.
    ///
    /// Returns extracted parameters if the path matches.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<PathParams> {
        let caps = self.regex.captures(path)?;

        let mut params = PathParams::new();
        for name in &self.param_names {
            if let Some(value) = caps.name(name) {
                params.insert(name.clone(), value.as_str());
            }
        }

        Some(params)
    }

    /// Extracts the parameters of a path already known to match.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::PathMismatch`] when the path does not match.
    pub fn parse_path_params(&self, path: &str) -> Result<PathParams> {
        self.match_path(path)
            .ok_or_else(|| RouterError::PathMismatch {
                path: path.to_string(),
                pattern: self.regex.as_str().to_string(),
            })
    }

    /// Returns the original pattern string.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the compiled regex.
    #[must_use]
    pub const fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Returns the parameter names.
    #[must_use]
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }
}

impl From<Regex> for PathPattern {
    fn from(regex: Regex) -> Self {
        Self::from_regex(regex)
    }
}

impl FromStr for PathPattern {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

fn is_param_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> PathParams {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_literal_path() {
        let pattern = PathPattern::new("/users").unwrap();
        assert!(pattern.is_match("/users"));
        assert!(pattern.is_match("/users/"));
        assert!(pattern.is_match("/users?page=2"));
        assert!(!pattern.is_match("/users//"));
        assert!(!pattern.is_match("/posts"));
        assert!(!pattern.is_match("/users/1"));
        assert!(!pattern.is_match("/api/users"));
    }

    #[test]
    fn test_literal_is_not_a_regex() {
        let pattern = PathPattern::new("/v1.0/items").unwrap();
        assert!(pattern.is_match("/v1.0/items"));
        assert!(!pattern.is_match("/v1x0/items"));
    }

    #[test]
    fn test_single_param() {
        let pattern = PathPattern::new("/users/{userId}").unwrap();

        for (path, id) in [
            ("/users/123", "123"),
            ("/users/abc", "abc"),
            ("/users/abc?foo=bar", "abc"),
            ("/users/123/", "123"),
            ("/users/abc/?foo=bar", "abc"),
        ] {
            assert_eq!(
                pattern.parse_path_params(path).unwrap(),
                params(&[("userId", id)]),
                "{path}"
            );
        }

        for path in ["/", "/users", "/users/", "/users/123/abc", "/users/123/abc/"] {
            assert!(!pattern.is_match(path), "{path}");
        }
    }

    #[test]
    fn test_multiple_params() {
        let pattern = PathPattern::new("/users/{userId}/foo/{bar}").unwrap();
        let expected = params(&[("userId", "abc"), ("bar", "dog")]);

        for path in [
            "/users/abc/foo/dog",
            "/users/abc/foo/dog/",
            "/users/abc/foo/dog?name=bob",
            "/users/abc/foo/dog/?name=bob",
            "/users/abc/foo/dog?x=1",
        ] {
            assert_eq!(pattern.parse_path_params(path).unwrap(), expected, "{path}");
        }

        for path in ["/users/123/abc", "/users/123/abc/", "/users/abc/foo/dog/def"] {
            assert!(!pattern.is_match(path), "{path}");
        }
    }

    #[test]
    fn test_param_inside_segment() {
        let pattern = PathPattern::new("/files/{name}.json").unwrap();
        let params = pattern.match_path("/files/report.json").unwrap();
        assert_eq!(params.get("name"), Some("report"));
    }

    #[test]
    fn test_wildcard() {
        let pattern = PathPattern::new("/users/*").unwrap();

        for path in [
            "/users",
            "/users/",
            "/users/abc",
            "/users/abc/foo/dog",
            "/users?name=bob",
            "/users/?name=bob",
            "/users/abc?name=bob",
            "/users/abc/foo/dog?name=bob",
        ] {
            assert!(pattern.parse_path_params(path).unwrap().is_empty(), "{path}");
        }

        for path in ["/invalidpath", "/other", "/usersabc"] {
            assert!(!pattern.is_match(path), "{path}");
        }
    }

    #[test]
    fn test_wildcard_with_param() {
        let pattern = PathPattern::new("/tenants/{tenant}/*").unwrap();
        let params = pattern.match_path("/tenants/acme/a/b/c").unwrap();
        assert_eq!(params.get("tenant"), Some("acme"));
    }

    #[test]
    fn test_trailing_slash_template() {
        let pattern = PathPattern::new("/docs/").unwrap();
        assert!(pattern.is_match("/docs/"));
        assert!(pattern.is_match("/docs"));
        assert!(pattern.is_match("/docs?x=1"));
        assert!(!pattern.is_match("/docs/intro"));

        let root = PathPattern::new("/").unwrap();
        assert!(root.is_match("/"));
        assert!(root.is_match("/?q=1"));
        assert!(!root.is_match("/a"));
    }

    #[test]
    fn test_precompiled_regex() {
        let regex = Regex::new(r"^/items/(?P<id>\d+)$").unwrap();
        let pattern = PathPattern::from(regex);

        assert_eq!(pattern.param_names(), ["id"]);
        assert_eq!(pattern.pattern(), r"^/items/(?P<id>\d+)$");
        assert_eq!(
            pattern.match_path("/items/42").unwrap().get("id"),
            Some("42")
        );
        assert!(!pattern.is_match("/items/abc"));
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let a = PathPattern::new("/a/{b}/c").unwrap();
        let b = PathPattern::new("/a/{b}/c").unwrap();
        assert_eq!(a.regex().as_str(), b.regex().as_str());
    }

    #[test]
    fn test_path_mismatch() {
        let pattern = PathPattern::new("/users/{id}").unwrap();
        let err = pattern.parse_path_params("/posts/1").unwrap_err();
        assert!(matches!(err, RouterError::PathMismatch { .. }));
    }

    #[test]
    fn test_invalid_templates() {
        for template in ["/users/{id", "/users/id}", "/users/{}", "/users/{a-b}", "/{1x}", "/{a}/{a}"] {
            let err = PathPattern::new(template).unwrap_err();
            assert!(
                matches!(err, RouterError::InvalidPattern { .. }),
                "{template}"
            );
        }
    }
}
