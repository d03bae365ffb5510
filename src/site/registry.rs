//! Configuration-backed site registry.
//!
//! Implements all three collaborator traits from the `[[sites]]` section of
//! the configuration. Immutable after construction; reloads build a new one.

use std::sync::Arc;

use serde_json::Value;

use crate::config::SiteConfig;
use crate::routing::RoutingError;
use crate::site::resolver;
use crate::site::{
    EnhancerConfigStore, PageCandidate, PageSlugIndex, Site, SiteLanguage, SiteResolver,
};

#[derive(Debug, Clone)]
struct PageRecord {
    id: u64,
    slug: String,
    language: u32,
}

#[derive(Debug)]
struct SiteEntry {
    pages: Vec<PageRecord>,
    route_enhancers: Value,
}

/// In-memory view of the configured sites.
#[derive(Debug, Default)]
pub struct SiteRegistry {
    sites: Vec<Arc<Site>>,
    entries: Vec<SiteEntry>,
}

impl SiteRegistry {
    pub fn from_config(sites: &[SiteConfig]) -> Self {
        let mut registry = Self::default();
        for config in sites {
            registry.sites.push(Arc::new(Site {
                identifier: config.identifier.clone(),
                base: config.base.clone(),
                default_language: SiteLanguage {
                    id: config.default_language.id,
                    locale: config.default_language.locale.clone(),
                },
            }));
            registry.entries.push(SiteEntry {
                pages: config
                    .pages
                    .iter()
                    .map(|page| PageRecord {
                        id: page.id,
                        slug: page.slug.clone(),
                        language: page.language,
                    })
                    .collect(),
                route_enhancers: config.route_enhancers.clone(),
            });
        }
        registry
    }

    pub fn sites(&self) -> &[Arc<Site>] {
        &self.sites
    }

    fn entry(&self, site: &Site) -> Option<&SiteEntry> {
        self.sites
            .iter()
            .position(|known| known.identifier == site.identifier)
            .map(|index| &self.entries[index])
    }
}

/// True when `slug` equals `path` or is a prefix of it ending on a `/` boundary.
fn is_slug_candidate(slug: &str, path: &str) -> bool {
    if slug == path {
        return true;
    }
    let prefix = slug.trim_end_matches('/');
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('/'))
}

impl SiteResolver for SiteRegistry {
    fn find_site_for_host(&self, host: &str) -> Option<Arc<Site>> {
        resolver::find_site_for_host(&self.sites, host)
    }
}

impl PageSlugIndex for SiteRegistry {
    fn candidates_for_path(
        &self,
        site: &Site,
        path: &str,
        language: &SiteLanguage,
    ) -> Result<Vec<PageCandidate>, RoutingError> {
        let entry = self
            .entry(site)
            .ok_or_else(|| RoutingError::IndexLookup(format!("unknown site '{}'", site.identifier)))?;

        Ok(entry
            .pages
            .iter()
            .filter(|page| page.language == language.id && is_slug_candidate(&page.slug, path))
            .map(|page| PageCandidate {
                page_id: page.id,
                slug: page.slug.clone(),
            })
            .collect())
    }
}

impl EnhancerConfigStore for SiteRegistry {
    fn route_enhancers(&self, site: &Site) -> Value {
        self.entry(site)
            .map(|entry| entry.route_enhancers.clone())
            .unwrap_or(Value::Null)
    }
}
