//! Page resolution by slug backoff.
//!
//! # Responsibilities
//! - Find the longest registered page slug that prefixes the request path
//!
//! # Design Decisions
//! - Only exact slug matches count; candidates merely bound the search
//! - The last `/` segment is removed on every miss
//! - An emptied path never matches, not even a root page
//! - Index failures are logged and treated as no match

use crate::site::{PageSlugIndex, Site};

/// A resolved page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMatch {
    pub page_id: u64,
    /// The page slug, a `/`-boundary prefix of the request path.
    pub slug: String,
}

/// Resolves request paths to pages.
pub struct PageResolver<'a> {
    index: &'a dyn PageSlugIndex,
}

impl<'a> PageResolver<'a> {
    pub fn new(index: &'a dyn PageSlugIndex) -> Self {
        Self { index }
    }

    pub fn resolve(&self, path: &str, site: &Site) -> Option<PageMatch> {
        let language = &site.default_language;
        let mut current = path.to_string();

        loop {
            let candidates = match self.index.candidates_for_path(site, &current, language) {
                Ok(candidates) => candidates,
                Err(error) => {
                    tracing::warn!(site = %site.identifier, path = %current, %error, "Page lookup failed");
                    return None;
                }
            };

            if candidates.is_empty() || current.is_empty() {
                return None;
            }

            if let Some(hit) = candidates.into_iter().find(|candidate| candidate.slug == current) {
                return Some(PageMatch {
                    page_id: hit.page_id,
                    slug: hit.slug,
                });
            }

            let cut = current.rfind('/').unwrap_or(0);
            current.truncate(cut);
        }
    }
}
