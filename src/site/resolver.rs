//! Host to site matching.
//!
//! # Responsibilities
//! - Parse each site's base URL into a host
//! - Compare it with the request host
//!
//! # Design Decisions
//! - A registry with a single site serves every host
//! - Host matching is case-insensitive and ignores the port
//! - A base that does not parse never matches; scanning continues

use std::sync::Arc;

use url::Url;

use crate::routing::RoutingError;
use crate::site::Site;

/// Normalizes a `Host` header value: lowercase, port removed.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let without_port = if host.starts_with('[') {
        // IPv6 literal, keep the brackets.
        match host.find(']') {
            Some(close) => &host[..=close],
            None => host,
        }
    } else {
        host.split(':').next().unwrap_or(host)
    };
    without_port.to_ascii_lowercase()
}

/// Extracts the host of a site's base URL.
pub fn base_host(site: &Site) -> Result<String, RoutingError> {
    let malformed = |reason: String| RoutingError::MalformedBaseUri {
        site: site.identifier.clone(),
        base: site.base.clone(),
        reason,
    };

    // Protocol-relative bases are common in site configurations.
    let absolute = if site.base.starts_with("//") {
        format!("http:{}", site.base)
    } else {
        site.base.clone()
    };

    let url = Url::parse(&absolute).map_err(|e| malformed(e.to_string()))?;
    url.host_str()
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| malformed("base has no host".to_string()))
}

/// Picks the site serving `host`.
pub fn find_site_for_host(sites: &[Arc<Site>], host: &str) -> Option<Arc<Site>> {
    if let [only] = sites {
        return Some(only.clone());
    }

    let host = normalize_host(host);
    for site in sites {
        match base_host(site) {
            Ok(base) if base == host => return Some(site.clone()),
            Ok(_) => continue,
            Err(error) => {
                tracing::debug!(%error, "Skipping site with unusable base");
            }
        }
    }
    None
}
