//! Request rewriting.
//!
//! Runs site, page, enhancer, decomposition and argument mapping in order.
//! Every step either advances or ends the chain with a pass-through reason.

use std::fmt;

use crate::query::QueryMap;
use crate::routing::arguments::ArgumentMapper;
use crate::routing::decompose::decompose;
use crate::routing::enhancer::EnhancerSelector;
use crate::routing::page::PageResolver;
use crate::site::{EnhancerConfigStore, PageSlugIndex, SiteRegistry, SiteResolver};

/// Why a request was forwarded unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassThroughReason {
    NoSite,
    NoPage,
    NoEnhancer,
    NoDynamicSegments,
}

impl PassThroughReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            PassThroughReason::NoSite => "no_site",
            PassThroughReason::NoPage => "no_page",
            PassThroughReason::NoEnhancer => "no_enhancer",
            PassThroughReason::NoDynamicSegments => "no_dynamic_segments",
        }
    }
}

impl fmt::Display for PassThroughReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The request as the next pipeline stage should see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenRequest {
    pub page_id: u64,
    /// Canonical page slug.
    pub path: String,
    /// Existing query parameters merged with the routed ones.
    pub query: QueryMap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    PassThrough(PassThroughReason),
    Rewrite(RewrittenRequest),
}

impl RewriteOutcome {
    /// Short label used for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            RewriteOutcome::PassThrough(reason) => reason.as_str(),
            RewriteOutcome::Rewrite(_) => "rewritten",
        }
    }
}

/// Translates pretty facet paths into query parameters.
pub struct RequestRewriter<'a> {
    sites: &'a dyn SiteResolver,
    pages: &'a dyn PageSlugIndex,
    enhancers: &'a dyn EnhancerConfigStore,
}

impl<'a> RequestRewriter<'a> {
    pub fn new(
        sites: &'a dyn SiteResolver,
        pages: &'a dyn PageSlugIndex,
        enhancers: &'a dyn EnhancerConfigStore,
    ) -> Self {
        Self {
            sites,
            pages,
            enhancers,
        }
    }

    /// Uses one registry for all three collaborators.
    pub fn from_registry(registry: &'a SiteRegistry) -> Self {
        Self::new(registry, registry, registry)
    }

    pub fn process(&self, host: &str, path: &str, query: &QueryMap) -> RewriteOutcome {
        let pass = |reason: PassThroughReason| {
            tracing::debug!(%host, %path, %reason, "Passing request through");
            RewriteOutcome::PassThrough(reason)
        };

        let Some(site) = self.sites.find_site_for_host(host) else {
            return pass(PassThroughReason::NoSite);
        };

        let Some(page) = PageResolver::new(self.pages).resolve(path, &site) else {
            return pass(PassThroughReason::NoPage);
        };

        let Some(enhancer) = EnhancerSelector::new(self.enhancers).select(&site, page.page_id) else {
            return pass(PassThroughReason::NoEnhancer);
        };

        let parsed = decompose(path, &enhancer.route_path, &page.slug);
        if !parsed.has_dynamic_segments() {
            return pass(PassThroughReason::NoDynamicSegments);
        }

        let routed = ArgumentMapper::new(enhancer.namespace(), enhancer.facet_value_separator())
            .expand(&parsed.values, &enhancer.arguments);

        let mut merged = query.clone();
        merged.merge(routed);

        tracing::debug!(
            site = %site.identifier,
            page_id = page.page_id,
            slug = %page.slug,
            segments = parsed.dynamic_segments.len(),
            "Rewriting facet path"
        );

        RewriteOutcome::Rewrite(RewrittenRequest {
            page_id: page.page_id,
            path: page.slug,
            query: merged,
        })
    }
}
