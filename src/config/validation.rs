//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, site identifiers and page records
//! - Reject facet enhancers whose value separator is empty
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Route patterns are not checked; malformed placeholders are dropped at runtime

use std::collections::HashSet;
use std::net::SocketAddr;

use serde_json::Value;
use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::routing::enhancer::FACET_ENHANCER_TYPE;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} '{value}' is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("site #{index} has an empty identifier")]
    EmptySiteIdentifier { index: usize },

    #[error("site identifier '{0}' is used more than once")]
    DuplicateSite(String),

    #[error("site '{site}': page id 0 is reserved (slug '{slug}')")]
    ReservedPageId { site: String, slug: String },

    #[error("site '{site}': slug '{slug}' of page {page_id} must start with '/'")]
    RelativeSlug { site: String, page_id: u64, slug: String },

    #[error("site '{site}': slug '{slug}' is registered twice for language {language}")]
    DuplicateSlug { site: String, slug: String, language: u32 },

    #[error("site '{site}': route enhancer '{enhancer}' has an empty facetValueSeparator")]
    EmptyFacetSeparator { site: String, enhancer: String },
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

/// Validates a parsed configuration.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address("listener.bind_address", &config.listener.bind_address, &mut errors);
    check_address("upstream.address", &config.upstream.address, &mut errors);
    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    let mut identifiers = HashSet::new();
    for (index, site) in config.sites.iter().enumerate() {
        if site.identifier.is_empty() {
            errors.push(ValidationError::EmptySiteIdentifier { index });
        } else if !identifiers.insert(site.identifier.as_str()) {
            errors.push(ValidationError::DuplicateSite(site.identifier.clone()));
        }

        let mut slugs = HashSet::new();
        for page in &site.pages {
            if page.id == 0 {
                errors.push(ValidationError::ReservedPageId {
                    site: site.identifier.clone(),
                    slug: page.slug.clone(),
                });
            }
            if !page.slug.starts_with('/') {
                errors.push(ValidationError::RelativeSlug {
                    site: site.identifier.clone(),
                    page_id: page.id,
                    slug: page.slug.clone(),
                });
            }
            if !slugs.insert((page.slug.as_str(), page.language)) {
                errors.push(ValidationError::DuplicateSlug {
                    site: site.identifier.clone(),
                    slug: page.slug.clone(),
                    language: page.language,
                });
            }
        }

        if let Value::Object(enhancers) = &site.route_enhancers {
            for (name, settings) in enhancers {
                let is_facet = settings.get("type").and_then(Value::as_str) == Some(FACET_ENHANCER_TYPE);
                let separator = settings
                    .pointer("/solr/facetValueSeparator")
                    .and_then(Value::as_str);
                if is_facet && separator == Some("") {
                    errors.push(ValidationError::EmptyFacetSeparator {
                        site: site.identifier.clone(),
                        enhancer: name.clone(),
                    });
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
