//! Route enhancer configuration and selection.
//!
//! Enhancers are declared per site as a mapping of name to settings:
//!
//! ```toml
//! [sites.route_enhancers.Products]
//! type = "CombinedFacetEnhancer"
//! limitToPages = [10]
//! routePath = "/{category}/{brand}"
//!
//! [sites.route_enhancers.Products._arguments]
//! category = "filter/type"
//! brand = "filter-brand"
//!
//! [sites.route_enhancers.Products.solr]
//! facetValueSeparator = ","
//! ```

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::site::{EnhancerConfigStore, Site};

/// The only enhancer kind this engine acts on.
pub const FACET_ENHANCER_TYPE: &str = "CombinedFacetEnhancer";

/// Root query parameter key used when no `extensionKey` is declared.
pub const DEFAULT_NAMESPACE: &str = "tx_solr";

pub const DEFAULT_FACET_VALUE_SEPARATOR: &str = ",";

/// Placeholder name to query path, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentMap(Vec<(String, String)>);

impl ArgumentMap {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, path)| (name.as_str(), path.as_str()))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.iter().find(|(existing, _)| *existing == name).map(|(_, path)| path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ArgumentMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(name, path)| (name.into(), path.into())).collect())
    }
}

impl<'de> Deserialize<'de> for ArgumentMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ArgumentMapVisitor;

        impl<'de> Visitor<'de> for ArgumentMapVisitor {
            type Value = ArgumentMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of placeholder names to query paths")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ArgumentMap, A::Error> {
                let mut entries: Vec<(String, String)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, path)) = access.next_entry::<String, String>()? {
                    entries.retain(|(existing, _)| *existing != name);
                    entries.push((name, path));
                }
                Ok(ArgumentMap(entries))
            }
        }

        deserializer.deserialize_map(ArgumentMapVisitor)
    }
}

/// Search-layer settings of an enhancer.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(rename = "facetValueSeparator", default = "default_facet_value_separator")]
    pub facet_value_separator: String,
}

fn default_facet_value_separator() -> String {
    DEFAULT_FACET_VALUE_SEPARATOR.to_string()
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            facet_value_separator: default_facet_value_separator(),
        }
    }
}

/// Reads a page id the way the CMS compares them: integers or numeric strings.
fn loose_page_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn loose_page_ids<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u64>, D::Error> {
    let raw = Vec::<Value>::deserialize(deserializer)?;
    Ok(raw.iter().filter_map(loose_page_id).collect())
}

/// A facet route enhancer as declared in the site configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteEnhancerConfig {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(rename = "limitToPages", deserialize_with = "loose_page_ids")]
    pub limit_to_pages: Vec<u64>,

    #[serde(rename = "routePath")]
    pub route_path: String,

    #[serde(rename = "_arguments", default)]
    pub arguments: ArgumentMap,

    #[serde(rename = "extensionKey", default)]
    pub extension_key: Option<String>,

    #[serde(default)]
    pub solr: SearchSettings,
}

impl RouteEnhancerConfig {
    /// Root query parameter key; empty means no root key.
    pub fn namespace(&self) -> &str {
        self.extension_key.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    }

    pub fn facet_value_separator(&self) -> &str {
        &self.solr.facet_value_separator
    }

    pub fn applies_to(&self, page_id: u64) -> bool {
        self.limit_to_pages.contains(&page_id)
    }
}

fn is_facet_enhancer(settings: &Value) -> bool {
    settings.get("type").and_then(Value::as_str) == Some(FACET_ENHANCER_TYPE)
}

fn limits_to_page(settings: &Value, page_id: u64) -> bool {
    settings
        .get("limitToPages")
        .and_then(Value::as_array)
        .is_some_and(|ids| ids.iter().any(|id| loose_page_id(id) == Some(page_id)))
}

/// Picks the enhancer for a resolved page.
pub struct EnhancerSelector<'a> {
    store: &'a dyn EnhancerConfigStore,
}

impl<'a> EnhancerSelector<'a> {
    pub fn new(store: &'a dyn EnhancerConfigStore) -> Self {
        Self { store }
    }

    /// Returns the first facet enhancer, in declaration order, limited to `page_id`.
    pub fn select(&self, site: &Site, page_id: u64) -> Option<RouteEnhancerConfig> {
        let Value::Object(enhancers) = self.store.route_enhancers(site) else {
            return None;
        };

        for (name, settings) in enhancers {
            if !is_facet_enhancer(&settings) || !limits_to_page(&settings, page_id) {
                continue;
            }

            match serde_json::from_value::<RouteEnhancerConfig>(settings) {
                Ok(config) => return Some(config),
                Err(error) => {
                    tracing::warn!(
                        site = %site.identifier,
                        enhancer = %name,
                        error = %error,
                        "Skipping malformed route enhancer"
                    );
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::SiteLanguage;
    use serde_json::json;

    struct FixedStore(Value);

    impl EnhancerConfigStore for FixedStore {
        fn route_enhancers(&self, _site: &Site) -> Value {
            self.0.clone()
        }
    }

    fn site() -> Site {
        Site {
            identifier: "shop".to_string(),
            base: "https://shop.example.com/".to_string(),
            default_language: SiteLanguage { id: 0, locale: "en_US.UTF-8".to_string() },
        }
    }

    #[test]
    fn test_first_matching_enhancer_wins() {
        let store = FixedStore(json!({
            "Plain": {"type": "Simple", "limitToPages": [10], "routePath": "/{x}"},
            "Other": {"type": "CombinedFacetEnhancer", "limitToPages": [11], "routePath": "/{y}"},
            "First": {"type": "CombinedFacetEnhancer", "limitToPages": [9, "10"], "routePath": "/{a}"},
            "Second": {"type": "CombinedFacetEnhancer", "limitToPages": [10], "routePath": "/{b}"}
        }));

        let config = EnhancerSelector::new(&store).select(&site(), 10).unwrap();
        assert_eq!(config.route_path, "/{a}");
        assert_eq!(config.limit_to_pages, vec![9, 10]);
    }

    #[test]
    fn test_missing_or_non_mapping_enhancers() {
        for raw in [Value::Null, json!({}), json!(["CombinedFacetEnhancer"]), json!("x")] {
            assert!(EnhancerSelector::new(&FixedStore(raw)).select(&site(), 10).is_none());
        }
    }

    #[test]
    fn test_no_enhancer_for_page() {
        let store = FixedStore(json!({
            "Products": {"type": "CombinedFacetEnhancer", "limitToPages": [10], "routePath": "/{a}"},
            "Unlimited": {"type": "CombinedFacetEnhancer", "routePath": "/{a}"}
        }));
        assert!(EnhancerSelector::new(&store).select(&site(), 12).is_none());
    }

    #[test]
    fn test_malformed_enhancer_is_skipped() {
        let store = FixedStore(json!({
            "Broken": {"type": "CombinedFacetEnhancer", "limitToPages": [10]},
            "Good": {"type": "CombinedFacetEnhancer", "limitToPages": [10], "routePath": "/{b}"}
        }));

        let config = EnhancerSelector::new(&store).select(&site(), 10).unwrap();
        assert_eq!(config.route_path, "/{b}");
    }

    #[test]
    fn test_defaults_and_overrides() {
        let store = FixedStore(json!({
            "Products": {
                "type": "CombinedFacetEnhancer",
                "limitToPages": [10],
                "routePath": "/{category}/{brand}",
                "_arguments": {"category": "filter/type", "brand": "filter-brand"}
            }
        }));
        let config = EnhancerSelector::new(&store).select(&site(), 10).unwrap();

        assert_eq!(config.namespace(), DEFAULT_NAMESPACE);
        assert_eq!(config.facet_value_separator(), ",");
        let names: Vec<&str> = config.arguments.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["category", "brand"]);

        let store = FixedStore(json!({
            "Products": {
                "type": "CombinedFacetEnhancer",
                "limitToPages": [10],
                "routePath": "/{brand}",
                "extensionKey": "tx_search",
                "solr": {"facetValueSeparator": "|"}
            }
        }));
        let config = EnhancerSelector::new(&store).select(&site(), 10).unwrap();

        assert_eq!(config.namespace(), "tx_search");
        assert_eq!(config.facet_value_separator(), "|");
        assert!(config.arguments.is_empty());
    }
}
