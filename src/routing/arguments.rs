//! Argument mapping.
//!
//! Expands placeholder values into the query parameter tree along the query
//! paths declared in `_arguments`:
//!
//! ```text
//! category = "filter/category", value "household"
//!     → tx_solr[filter][category]=household
//! facet = "filter-type", value "shoes,boots"
//!     → tx_solr[filter][]=type:shoes, tx_solr[filter][]=type:boots
//! ```
//!
//! A key containing the facet marker is always a leaf: the part before the
//! marker names the sequence, the part after it names the facet.

use crate::query::QueryMap;
use crate::routing::decompose::PlaceholderValues;
use crate::routing::enhancer::ArgumentMap;

/// Separates the sequence key from the facet name in a query path key.
pub const FACET_MARKER: char = '-';

/// One key of a query path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryKey<'a> {
    /// Descend into (or set) a nested key.
    Nested(&'a str),
    /// Append `facet:value` tokens to the sequence under `base`.
    Facet { base: &'a str, facet: &'a str },
}

impl<'a> QueryKey<'a> {
    fn parse(key: &'a str) -> Self {
        match key.split_once(FACET_MARKER) {
            Some((base, facet)) => QueryKey::Facet { base, facet },
            None => QueryKey::Nested(key),
        }
    }
}

/// Builds query parameter trees for one enhancer.
#[derive(Debug, Clone, Copy)]
pub struct ArgumentMapper<'a> {
    namespace: &'a str,
    facet_separator: &'a str,
}

impl<'a> ArgumentMapper<'a> {
    pub fn new(namespace: &'a str, facet_separator: &'a str) -> Self {
        Self {
            namespace,
            facet_separator,
        }
    }

    /// Expands every mapped placeholder that has a value.
    ///
    /// Fields are applied in mapping order; unmapped placeholders and mappings
    /// without a value are skipped.
    pub fn expand(&self, values: &PlaceholderValues, arguments: &ArgumentMap) -> QueryMap {
        let mut tree = QueryMap::new();

        for (field, query_path) in arguments.iter() {
            let Some(value) = values.get(field) else {
                tracing::trace!(field, "No path value for argument");
                continue;
            };

            let mut chain: Vec<&str> = Vec::new();
            if !self.namespace.is_empty() {
                chain.push(self.namespace);
            }
            chain.extend(query_path.split('/'));

            self.apply(&mut tree, &chain, value);
        }

        tree
    }

    fn apply(&self, level: &mut QueryMap, chain: &[&str], value: &str) {
        let Some((key, rest)) = chain.split_first() else {
            return;
        };

        match QueryKey::parse(key) {
            QueryKey::Facet { base, facet } => {
                let tokens = level.entry_map(base);
                for single in self.split_values(value) {
                    tokens.push(format!("{facet}:{single}"));
                }
            }
            QueryKey::Nested(name) if rest.is_empty() => {
                level.insert(name, value);
            }
            QueryKey::Nested(name) => self.apply(level.entry_map(name), rest, value),
        }
    }

    fn split_values<'v>(&self, value: &'v str) -> Vec<&'v str> {
        if self.facet_separator.is_empty() {
            return vec![value];
        }
        value.split(self.facet_separator).collect()
    }
}
