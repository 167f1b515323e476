// ABOUTME: Compiles provider URL schemes (globs with `*` wildcards) into anchored regexes
// ABOUTME: Handles subdomain, path, and suffix wildcards plus http/https normalization

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::constants::limits;
use crate::error::OembedError;
use crate::Result;

/// Splits `http(s)://host/rest` into host and the remainder starting at the first `/`.
static SCHEME_PARTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://([^/]*)(.*)$").expect("scheme split pattern is valid"));

/// Prefix accepting either scheme regardless of what the catalog declared
const ANY_HTTP_SCHEME: &str = "https?://";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wildcard {
    /// `*` inside the host with more text after it, e.g. `*.example.com`
    Subdomain,
    /// `*` in the path with more text after it
    Path,
    /// `*` as the final character of the scheme
    Suffix,
}

impl Wildcard {
    fn classify(in_host: bool, is_final: bool) -> Self {
        if is_final {
            Wildcard::Suffix
        } else if in_host {
            Wildcard::Subdomain
        } else {
            Wildcard::Path
        }
    }

    fn as_regex(self) -> &'static str {
        match self {
            Wildcard::Subdomain => "[^/]+?",
            Wildcard::Path => ".*?",
            Wildcard::Suffix => ".*",
        }
    }
}

/// A compiled, fully anchored URL scheme.
#[derive(Debug, Clone)]
pub struct SchemePattern {
    scheme: String,
    regex: Regex,
}

impl SchemePattern {
    /// Compile a catalog scheme such as `https://*.example.com/watch/*`.
    pub fn compile(scheme: &str) -> Result<Self> {
        if scheme.is_empty() {
            return Err(OembedError::PatternCompile {
                scheme: String::new(),
                reason: "scheme is empty".to_string(),
            });
        }

        let expression = translate(scheme);
        let regex = RegexBuilder::new(&expression)
            .size_limit(limits::PATTERN_SIZE_LIMIT)
            .build()
            .map_err(|e| OembedError::PatternCompile {
                scheme: scheme.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            scheme: scheme.to_string(),
            regex,
        })
    }

    /// True when the whole of `url` matches the scheme.
    pub fn is_match(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }

    /// The scheme as declared in the catalog.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The generated regular expression.
    pub fn as_regex(&self) -> &str {
        self.regex.as_str()
    }
}

/// Translate a scheme into regex source. Literal text is escaped, so `?` and `.`
/// only ever match themselves.
fn translate(scheme: &str) -> String {
    let mut expression = String::with_capacity(scheme.len() * 2 + 2);
    expression.push('^');

    match SCHEME_PARTS.captures(scheme) {
        Some(parts) => {
            let host = parts.get(1).map_or("", |m| m.as_str());
            let rest = parts.get(2).map_or("", |m| m.as_str());

            expression.push_str(ANY_HTTP_SCHEME);
            push_segment(&mut expression, host, rest.is_empty(), true);
            push_segment(&mut expression, rest, true, false);
        }
        // Non-http schemes like `spotify:*` have no host section
        None => push_segment(&mut expression, scheme, true, false),
    }

    expression.push('$');
    expression
}

fn push_segment(expression: &mut String, segment: &str, ends_scheme: bool, in_host: bool) {
    let pieces: Vec<&str> = segment.split('*').collect();
    let last = pieces.len() - 1;

    for (index, literal) in pieces.iter().enumerate() {
        expression.push_str(&regex::escape(literal));

        if index < last {
            let is_final = ends_scheme && index + 1 == last && pieces[last].is_empty();
            expression.push_str(Wildcard::classify(in_host, is_final).as_regex());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(scheme: &str) -> SchemePattern {
        SchemePattern::compile(scheme).unwrap()
    }

    #[test]
    fn test_exact_scheme_matches_only_itself() {
        let pattern = compile("https://example.com/watch");

        assert!(pattern.is_match("https://example.com/watch"));
        assert!(!pattern.is_match("https://example.com/watch/1"));
        assert!(!pattern.is_match("https://example.com/watc"));
        assert!(!pattern.is_match("https://exampleXcom/watch"));
        assert!(!pattern.is_match("xhttps://example.com/watch"));
    }

    #[test]
    fn test_scheme_insensitive_prefix() {
        let https = compile("https://example.com/*");
        assert!(https.is_match("http://example.com/anything"));
        assert!(https.is_match("https://example.com/anything/nested/path"));

        let http = compile("http://example.com/page");
        assert!(http.is_match("https://example.com/page"));
        assert!(http.is_match("http://example.com/page"));
        assert!(!http.is_match("ftp://example.com/page"));
    }

    #[test]
    fn test_subdomain_wildcard() {
        let pattern = compile("https://*.example.com/*");

        assert!(pattern.is_match("https://sub.example.com/x"));
        assert!(pattern.is_match("https://a.b.example.com/x"));
        assert!(!pattern.is_match("https://example.com/x"));
        assert!(!pattern.is_match("http://sub.example.com.evil.com/x"));
        assert!(!pattern.is_match("https://evil.com/.example.com/x"));
    }

    #[test]
    fn test_subdomain_wildcard_without_path() {
        let pattern = compile("https://*.example.com");

        assert!(pattern.is_match("https://www.example.com"));
        assert!(!pattern.is_match("https://www.example.com/x"));
        assert!(!pattern.is_match("https://.example.com"));
    }

    #[test]
    fn test_path_wildcard_in_middle() {
        let pattern = compile("https://example.com/*/video/*");

        assert!(pattern.is_match("https://example.com/user/video/123"));
        assert!(pattern.is_match("https://example.com/a/b/video/123"));
        assert!(!pattern.is_match("https://example.com/user/photo/123"));
    }

    #[test]
    fn test_path_wildcard_followed_by_literal() {
        let pattern = compile("https://example.com/*.json");

        assert!(pattern.is_match("https://example.com/data/feed.json"));
        assert!(!pattern.is_match("https://example.com/data/feed.xml"));
    }

    #[test]
    fn test_literal_question_mark() {
        let pattern = compile("https://example.com/watch?v=*");

        assert!(pattern.is_match("https://example.com/watch?v=abc"));
        assert!(!pattern.is_match("https://example.com/watcv=abc"));
        assert!(!pattern.is_match("https://example.com/watc?v=abc"));
    }

    #[test]
    fn test_suffix_wildcard_in_host() {
        let pattern = compile("https://example.*");

        assert!(pattern.is_match("https://example.org/page"));
        assert!(pattern.is_match("https://example.co.uk"));
    }

    #[test]
    fn test_non_http_scheme() {
        let pattern = compile("spotify:*");

        assert!(pattern.is_match("spotify:track:123"));
        assert!(!pattern.is_match("https://open.spotify.com/track/123"));
        assert_eq!(pattern.as_regex(), "^spotify:.*$");
    }

    #[test]
    fn test_generated_regex() {
        assert_eq!(
            compile("https://*.example.com/*").as_regex(),
            r"^https?://[^/]+?\.example\.com/.*$"
        );
        assert_eq!(
            compile("http://example.com/*/v/*").as_regex(),
            r"^https?://example\.com/.*?/v/.*$"
        );
        assert_eq!(compile("https://example.com/*").scheme(), "https://example.com/*");
    }

    #[test]
    fn test_empty_scheme_is_rejected() {
        let result = SchemePattern::compile("");
        assert!(matches!(
            result,
            Err(OembedError::PatternCompile { ref scheme, .. }) if scheme.is_empty()
        ));
    }

    #[test]
    fn test_oversized_scheme_is_rejected() {
        let scheme = format!("https://example.com/{}", "*a".repeat(200_000));
        let result = SchemePattern::compile(&scheme);
        assert!(matches!(result, Err(OembedError::PatternCompile { .. })));
    }
}
