//! Request middleware applied ahead of the forwarding handler.

pub mod rewrite;

pub use rewrite::{facet_routing_middleware, QueryParameters, RewriteState};
