//! Sites, pages and the read-only collaborators the rewriter consults.
//!
//! # Data Flow
//! ```text
//! RouterConfig.sites
//!     → registry.rs (SiteRegistry: sites, page slugs, raw enhancer tables)
//!     → resolver.rs (host → Site)
//!     → routing engine reads through the three traits below
//! ```
//!
//! # Design Decisions
//! - The engine only sees traits, never the registry itself
//! - One registry snapshot serves a whole request; reloads swap the snapshot
//! - Only the default language is consulted

pub mod registry;
pub mod resolver;

use std::sync::Arc;

use serde_json::Value;

use crate::routing::RoutingError;

pub use registry::SiteRegistry;

/// A language a site is served in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLanguage {
    pub id: u32,
    pub locale: String,
}

/// A configured site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    /// Unique key of the site.
    pub identifier: String,
    /// Base URL as declared, e.g. `https://shop.example.com/`.
    pub base: String,
    pub default_language: SiteLanguage,
}

/// A page whose slug could match a requested path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCandidate {
    pub page_id: u64,
    pub slug: String,
}

/// Finds the site serving a host.
pub trait SiteResolver: Send + Sync {
    fn find_site_for_host(&self, host: &str) -> Option<Arc<Site>>;
}

/// Looks up pages by slug.
pub trait PageSlugIndex: Send + Sync {
    /// Returns the pages of `site` in `language` whose slug equals `path` or
    /// is a `/`-boundary prefix of it.
    fn candidates_for_path(
        &self,
        site: &Site,
        path: &str,
        language: &SiteLanguage,
    ) -> Result<Vec<PageCandidate>, RoutingError>;
}

/// Hands out the raw route enhancer declarations of a site.
pub trait EnhancerConfigStore: Send + Sync {
    /// The declared enhancer structure, `Value::Null` when none is configured.
    /// It is not guaranteed to be a mapping.
    fn route_enhancers(&self, site: &Site) -> Value;
}
