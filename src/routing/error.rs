//! Routing error kinds.
//!
//! None of these cross the pipeline boundary: every caller recovers locally
//! and forwards the request unchanged.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// A site's base URL does not parse or names no host.
    #[error("malformed base URI '{base}' for site '{site}': {reason}")]
    MalformedBaseUri {
        site: String,
        base: String,
        reason: String,
    },

    /// A route pattern segment at a dynamic position is not `{name}`.
    #[error("malformed placeholder token '{0}' in route pattern")]
    MalformedPlaceholder(String),

    /// The page slug index could not answer.
    #[error("page slug lookup failed: {0}")]
    IndexLookup(String),
}
