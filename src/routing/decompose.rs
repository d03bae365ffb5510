//! Path decomposition.
//!
//! Splits a request path into the page slug and the dynamic tail described
//! by a route pattern:
//!
//! ```text
//! /products/household/type-shoes   with   /{category}/{facet}
//! └──slug─┘ └──────dynamic tail──────┘
//!            category=household, facet=type-shoes
//! ```

use std::borrow::Cow;

use crate::routing::pattern::{parse_placeholder, RoutePattern};

/// Placeholder values in path order. A repeated name resolves to its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderValues(Vec<(String, String)>);

impl PlaceholderValues {
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PlaceholderValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = PlaceholderValues::default();
        for (name, value) in iter {
            values.insert(name, value);
        }
        values
    }
}

/// Result of splitting a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    /// Everything in front of the dynamic tail.
    pub slug: String,
    /// Decoded tail segments, one per pattern position.
    pub dynamic_segments: Vec<String>,
    /// Tail values keyed by placeholder name.
    pub values: PlaceholderValues,
}

impl ParsedPath {
    fn static_only(slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            dynamic_segments: Vec::new(),
            values: PlaceholderValues::default(),
        }
    }

    pub fn has_dynamic_segments(&self) -> bool {
        !self.dynamic_segments.is_empty()
    }
}

fn decode_segment(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

/// Splits `request_path` into slug and dynamic segments aligned to `route_pattern`.
///
/// A path equal to `matched_slug`, or one with no more segments than the
/// pattern has positions, yields no dynamic segments.
pub fn decompose(request_path: &str, route_pattern: &str, matched_slug: &str) -> ParsedPath {
    if request_path == matched_slug {
        return ParsedPath::static_only(matched_slug);
    }

    let pattern = RoutePattern::parse(route_pattern);
    let path_segments: Vec<&str> = request_path.split('/').collect();
    if path_segments.len() <= pattern.len() {
        return ParsedPath::static_only(request_path);
    }

    let (slug, tail) = path_segments.split_at(path_segments.len() - pattern.len());
    let mut parsed = ParsedPath {
        slug: slug.join("/"),
        dynamic_segments: Vec::with_capacity(tail.len()),
        values: PlaceholderValues::default(),
    };

    for (raw, token) in tail.iter().zip(pattern.segments()) {
        let value = decode_segment(raw);
        match parse_placeholder(token) {
            Ok(name) => parsed.values.insert(name, value.clone()),
            Err(error) => {
                tracing::debug!(%error, segment = %raw, "Dropping dynamic segment");
            }
        }
        parsed.dynamic_segments.push(value);
    }

    parsed
}
