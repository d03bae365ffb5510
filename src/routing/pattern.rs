//! Route pattern tokenizer.
//!
//! A pattern such as `/{category}/{brand}` is a `/`-delimited list of
//! placeholder tokens. Each token wraps its name in `{` and `}`.

use crate::routing::RoutingError;

pub const PLACEHOLDER_OPEN: char = '{';
pub const PLACEHOLDER_CLOSE: char = '}';

/// Extracts the placeholder name from a `{name}` token.
pub fn parse_placeholder(token: &str) -> Result<&str, RoutingError> {
    token
        .strip_prefix(PLACEHOLDER_OPEN)
        .and_then(|inner| inner.strip_suffix(PLACEHOLDER_CLOSE))
        .filter(|name| !name.is_empty())
        .ok_or_else(|| RoutingError::MalformedPlaceholder(token.to_string()))
}

/// A route pattern split into its segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern<'a> {
    segments: Vec<&'a str>,
}

impl<'a> RoutePattern<'a> {
    /// Splits `pattern` on `/`, dropping one leading and one trailing empty segment.
    pub fn parse(pattern: &'a str) -> Self {
        let mut segments: Vec<&str> = pattern.split('/').collect();
        if segments.first().is_some_and(|first| first.is_empty()) {
            segments.remove(0);
        }
        if segments.last().is_some_and(|last| last.is_empty()) {
            segments.pop();
        }
        Self { segments }
    }

    /// Number of dynamic positions.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    /// Placeholder names in order; malformed tokens yield an error in place.
    pub fn placeholders(&self) -> impl Iterator<Item = Result<&'a str, RoutingError>> + '_ {
        self.segments.iter().copied().map(parse_placeholder)
    }
}
