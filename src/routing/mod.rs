//! Facet routing engine.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, path, query)
//!     → SiteResolver (host → Site)
//!     → page.rs (path → PageMatch by slug backoff)
//!     → enhancer.rs (Site + page id → RouteEnhancerConfig)
//!     → decompose.rs (path + routePath → slug + placeholder values)
//!     → arguments.rs (values + _arguments → QueryMap)
//!     → rewriter.rs (merge into existing query, path := page slug)
//!     → Return: Rewrite or PassThrough(reason)
//! ```
//!
//! # Design Decisions
//! - Fail open: any missing piece forwards the request unchanged
//! - Collaborators are injected as traits and only read
//! - All per-request state lives on the stack of one `process` call

pub mod arguments;
pub mod decompose;
pub mod enhancer;
pub mod error;
pub mod page;
pub mod pattern;
pub mod rewriter;

pub use arguments::ArgumentMapper;
pub use decompose::{decompose, ParsedPath, PlaceholderValues};
pub use enhancer::{ArgumentMap, EnhancerSelector, RouteEnhancerConfig};
pub use error::RoutingError;
pub use page::{PageMatch, PageResolver};
pub use rewriter::{PassThroughReason, RequestRewriter, RewriteOutcome, RewrittenRequest};
