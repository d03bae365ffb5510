//! Facet routing middleware.
//!
//! Runs before the forwarding handler. Rewrites the request URI when a facet
//! enhancer applies and always attaches the decoded query parameters.

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{header, uri::PathAndQuery, Request, Uri},
    middleware::Next,
    response::Response,
};

use crate::observability::metrics;
use crate::query::{encode_query, parse_query, QueryMap};
use crate::routing::{RequestRewriter, RewriteOutcome};
use crate::site::SiteRegistry;

/// Shared, hot-swappable site registry.
#[derive(Clone)]
pub struct RewriteState {
    registry: Arc<ArcSwap<SiteRegistry>>,
}

impl RewriteState {
    pub fn new(registry: SiteRegistry) -> Self {
        Self {
            registry: Arc::new(ArcSwap::from_pointee(registry)),
        }
    }

    /// Replace the registry; in-flight requests finish on the old one.
    pub fn replace(&self, registry: SiteRegistry) {
        self.registry.store(Arc::new(registry));
    }

    pub fn registry(&self) -> Arc<SiteRegistry> {
        self.registry.load_full()
    }
}

/// Final query parameters of a request, as seen by downstream stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameters(pub QueryMap);

fn request_host(req: &Request<Body>) -> String {
    req.headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| req.uri().host())
        .unwrap_or_default()
        .to_string()
}

fn rewrite_uri(original: &Uri, path: &str, query: &QueryMap) -> Result<Uri, axum::http::Error> {
    let encoded = encode_query(query);
    let path_and_query = match (path.is_empty(), encoded.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/?{encoded}"),
        (false, true) => path.to_string(),
        (false, false) => format!("{path}?{encoded}"),
    };

    let mut parts = original.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query)?);
    Ok(Uri::from_parts(parts)?)
}

pub async fn facet_routing_middleware(
    State(state): State<RewriteState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let host = request_host(&req);
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(parse_query).unwrap_or_default();

    let outcome = {
        let registry = state.registry();
        RequestRewriter::from_registry(&registry).process(&host, &path, &query)
    };
    metrics::record_outcome(outcome.label());

    let parameters = match outcome {
        RewriteOutcome::PassThrough(_) => query,
        RewriteOutcome::Rewrite(rewritten) => {
            match rewrite_uri(req.uri(), &rewritten.path, &rewritten.query) {
                Ok(uri) => {
                    tracing::debug!(from = %path, to = %uri, page_id = rewritten.page_id, "Request rewritten");
                    *req.uri_mut() = uri;
                    rewritten.query
                }
                Err(error) => {
                    tracing::warn!(%path, %error, "Could not build rewritten URI, forwarding original");
                    query
                }
            }
        }
    };

    req.extensions_mut().insert(QueryParameters(parameters));
    next.run(req).await
}
