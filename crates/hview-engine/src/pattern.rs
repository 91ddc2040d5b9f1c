//! URL pattern matching
//!
//! Regions declare interest with a pattern string. Two forms exist, and
//! the distinction carries meaning: a pattern starting with `/` that has no
//! query component is matched against the destination *path only*, so it
//! keeps matching across query-string navigations (a persistent filter UI
//! stays marked while its content updates). Anything else is matched
//! against the complete serialized URL, resolved against the session base
//! when relative.
//!
//! `*` matches any run of characters; `:name` matches one non-empty path
//! segment.

use url::Url;

/// Pattern compilation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("empty URL pattern")]
    Empty,

    #[error("named group without a name in pattern '{0}'")]
    UnnamedGroup(String),

    #[error("pattern '{0}' cannot be resolved against the base URL")]
    Unresolvable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    /// `*` - any run of characters, possibly empty
    Wildcard,
    /// `:name` - one non-empty path segment
    Segment,
}

/// A compiled URL pattern
#[derive(Debug, Clone)]
pub struct UrlPattern {
    source: String,
    tokens: Vec<Token>,
    path_only: bool,
}

impl UrlPattern {
    /// Compile `pattern`, resolving relative full patterns against `base`
    pub fn compile(pattern: &str, base: &Url) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }

        let path_only = pattern.starts_with('/') && !pattern.contains('?');
        let subject = if path_only || pattern.contains("://") {
            pattern.to_string()
        } else {
            // Relative full pattern; anchor it the way the host would
            // resolve a relative URL. Wildcards survive resolution since
            // they are valid URL characters.
            base.join(pattern)
                .map_err(|_| PatternError::Unresolvable(pattern.to_string()))?
                .to_string()
        };

        let tokens = tokenize(&subject, pattern)?;
        Ok(Self {
            source: pattern.to_string(),
            tokens,
            path_only,
        })
    }

    /// The pattern string as written
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether this pattern ignores the query component
    pub fn is_path_only(&self) -> bool {
        self.path_only
    }

    /// Test a URL against this pattern
    pub fn matches(&self, url: &Url) -> bool {
        let subject = if self.path_only {
            url.path()
        } else {
            url.as_str()
        };
        match_tokens(&self.tokens, subject)
    }
}

fn tokenize(subject: &str, original: &str) -> Result<Vec<Token>, PatternError> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = subject.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Wildcard);
            }
            ':' => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if name.is_empty() {
                    return Err(PatternError::UnnamedGroup(original.to_string()));
                }
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Segment);
            }
            c => literal.push(c),
        }
    }
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    Ok(tokens)
}

fn match_tokens(tokens: &[Token], subject: &str) -> bool {
    let Some(first) = tokens.first() else {
        return subject.is_empty();
    };
    match first {
        Token::Literal(lit) => subject
            .strip_prefix(lit.as_str())
            .is_some_and(|rest| match_tokens(&tokens[1..], rest)),
        Token::Wildcard => (0..=subject.len())
            .rev()
            .filter(|&i| subject.is_char_boundary(i))
            .any(|i| match_tokens(&tokens[1..], &subject[i..])),
        Token::Segment => {
            let end = subject
                .find(['/', '?', '#'])
                .unwrap_or(subject.len());
            (1..=end)
                .rev()
                .filter(|&i| subject.is_char_boundary(i))
                .any(|i| match_tokens(&tokens[1..], &subject[i..]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/movies").unwrap()
    }

    fn url(s: &str) -> Url {
        base().join(s).unwrap()
    }

    #[test]
    fn test_path_wildcard_matches_everything() {
        let pattern = UrlPattern::compile("/*", &base()).unwrap();
        assert!(pattern.is_path_only());
        assert!(pattern.matches(&url("/")));
        assert!(pattern.matches(&url("/movies")));
        assert!(pattern.matches(&url("/movie/42")));
    }

    #[test]
    fn test_path_pattern_ignores_query() {
        let pattern = UrlPattern::compile("/movies*", &base()).unwrap();
        assert!(pattern.matches(&url("/movies")));
        assert!(pattern.matches(&url("/movies?q=batman")));
        assert!(!pattern.matches(&url("/people?q=batman")));
    }

    #[test]
    fn test_path_prefix() {
        let pattern = UrlPattern::compile("/articles/*", &base()).unwrap();
        assert!(pattern.matches(&url("/articles/1")));
        assert!(pattern.matches(&url("/articles/2024/01")));
        assert!(!pattern.matches(&url("/movies")));
    }

    #[test]
    fn test_named_segment() {
        let pattern = UrlPattern::compile("/movie/:id", &base()).unwrap();
        assert!(pattern.matches(&url("/movie/42")));
        assert!(!pattern.matches(&url("/movie/")));
        assert!(!pattern.matches(&url("/movie/42/cast")));
    }

    #[test]
    fn test_full_pattern_sees_query() {
        let pattern = UrlPattern::compile("/movies?q=*", &base()).unwrap();
        assert!(!pattern.is_path_only());
        assert!(pattern.matches(&url("/movies?q=batman")));
        assert!(!pattern.matches(&url("/movies")));
    }

    #[test]
    fn test_absolute_full_pattern() {
        let pattern = UrlPattern::compile("https://example.com/*", &base()).unwrap();
        assert!(pattern.matches(&url("/anything?q=1")));
        assert!(!pattern.matches(&Url::parse("https://other.example/x").unwrap()));
    }

    #[test]
    fn test_empty_pattern_is_error() {
        assert!(matches!(
            UrlPattern::compile("", &base()),
            Err(PatternError::Empty)
        ));
    }

    #[test]
    fn test_unnamed_group_is_error() {
        assert!(matches!(
            UrlPattern::compile("/movie/:", &base()),
            Err(PatternError::UnnamedGroup(_))
        ));
    }
}
