//! Facet routing middleware driven in-process through `tower::ServiceExt`.

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    middleware,
    routing::any,
    Json, Router,
};
use facet_router::http::middleware::{facet_routing_middleware, QueryParameters, RewriteState};
use facet_router::site::SiteRegistry;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{sample_config, BLOG_HOST, SHOP_HOST};

async fn echo(request: Request<Body>) -> Json<Value> {
    let query = request
        .extensions()
        .get::<QueryParameters>()
        .map(|parameters| parameters.0.to_json())
        .unwrap_or(Value::Null);

    Json(json!({
        "path": request.uri().path(),
        "query_string": request.uri().query(),
        "query": query,
    }))
}

fn app(state: RewriteState) -> Router {
    Router::new()
        .route("/", any(echo))
        .route("/{*path}", any(echo))
        .layer(middleware::from_fn_with_state(state, facet_routing_middleware))
}

fn shop_state() -> RewriteState {
    RewriteState::new(SiteRegistry::from_config(&sample_config().sites))
}

async fn send(state: RewriteState, host: &str, uri: &str) -> Value {
    let response = app(state)
        .oneshot(
            Request::builder()
                .uri(uri)
                .header("Host", host)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_category_and_facet_share_the_filter_key() {
    let seen = send(shop_state(), SHOP_HOST, "/products/household/shoes").await;

    assert_eq!(seen["path"], "/products");
    assert_eq!(
        seen["query"],
        json!({"tx_solr": {"filter": {"category": "household", "0": "type:shoes"}}})
    );
    assert_eq!(
        seen["query_string"],
        "tx_solr%5Bfilter%5D%5Bcategory%5D=household&tx_solr%5Bfilter%5D%5B0%5D=type%3Ashoes"
    );
}

#[tokio::test]
async fn test_facet_segment_is_used_verbatim() {
    // The whole segment is the facet value; the facet name comes from the mapping.
    let seen = send(shop_state(), SHOP_HOST, "/products/household/type-shoes").await;

    assert_eq!(seen["path"], "/products");
    assert_eq!(
        seen["query"],
        json!({"tx_solr": {"filter": {"category": "household", "0": "type:type-shoes"}}})
    );
}

#[tokio::test]
async fn test_multi_value_facet_is_split() {
    let seen = send(shop_state(), SHOP_HOST, "/products/garden/shoes,boots").await;

    assert_eq!(
        seen["query"]["tx_solr"]["filter"],
        json!({"category": "garden", "0": "type:shoes", "1": "type:boots"})
    );
}

#[tokio::test]
async fn test_custom_namespace_and_separator() {
    let seen = send(shop_state(), SHOP_HOST, "/brands/acme+nike").await;

    assert_eq!(seen["path"], "/brands");
    assert_eq!(
        seen["query"],
        json!({"tx_search": {"filter": ["brand:acme", "brand:nike"]}})
    );
}

#[tokio::test]
async fn test_percent_encoded_segments_are_decoded() {
    let seen = send(shop_state(), SHOP_HOST, "/products/home%20office/desk%20lamps").await;

    assert_eq!(
        seen["query"]["tx_solr"]["filter"],
        json!({"category": "home office", "0": "type:desk lamps"})
    );
}

#[tokio::test]
async fn test_routed_parameters_extend_existing_query() {
    let seen = send(
        shop_state(),
        SHOP_HOST,
        "/products/household/shoes?tx_solr%5Bfilter%5D%5B%5D=color%3Ared&page=2",
    )
    .await;

    assert_eq!(seen["path"], "/products");
    assert_eq!(
        seen["query"],
        json!({
            "tx_solr": {"filter": {"0": "color:red", "category": "household", "1": "type:shoes"}},
            "page": "2"
        })
    );
}

#[tokio::test]
async fn test_exact_slug_passes_through() {
    let seen = send(shop_state(), SHOP_HOST, "/products?page=2").await;

    assert_eq!(seen["path"], "/products");
    assert_eq!(seen["query_string"], "page=2");
    assert_eq!(seen["query"], json!({"page": "2"}));
}

#[tokio::test]
async fn test_tail_is_aligned_to_the_end_of_the_path() {
    // Two placeholders always take the last two segments, slug included.
    let seen = send(shop_state(), SHOP_HOST, "/products/household").await;

    assert_eq!(seen["path"], "/products");
    assert_eq!(
        seen["query"]["tx_solr"]["filter"],
        json!({"category": "products", "0": "type:household"})
    );
}

#[tokio::test]
async fn test_page_without_enhancer_passes_through() {
    let seen = send(shop_state(), SHOP_HOST, "/about/team/berlin").await;
    assert_eq!(seen["path"], "/about/team/berlin");
    assert_eq!(seen["query_string"], Value::Null);

    let seen = send(shop_state(), BLOG_HOST, "/posts/2024/rust").await;
    assert_eq!(seen["path"], "/posts/2024/rust");
}

#[tokio::test]
async fn test_unknown_host_passes_through() {
    let seen = send(shop_state(), "elsewhere.test", "/products/household/shoes").await;

    assert_eq!(seen["path"], "/products/household/shoes");
    assert_eq!(seen["query"], json!({}));
}

#[tokio::test]
async fn test_host_port_is_ignored() {
    let seen = send(shop_state(), "shop.example.com:8080", "/products/household/shoes").await;
    assert_eq!(seen["path"], "/products");
}

#[tokio::test]
async fn test_replaced_registry_applies_to_next_request() {
    let state = shop_state();
    let seen = send(state.clone(), SHOP_HOST, "/products/household/shoes").await;
    assert_eq!(seen["path"], "/products");

    let mut config = sample_config();
    for site in &mut config.sites {
        site.route_enhancers = Value::Null;
    }
    state.replace(SiteRegistry::from_config(&config.sites));

    let seen = send(state, SHOP_HOST, "/products/household/shoes").await;
    assert_eq!(seen["path"], "/products/household/shoes");
}
