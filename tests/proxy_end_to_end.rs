//! Full proxy: client → facet-router → echo upstream.

mod common;

use std::net::SocketAddr;
use std::time::Duration;

use facet_router::config::RouterConfig;
use facet_router::lifecycle::Shutdown;
use facet_router::HttpServer;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use common::{single_site_config, start_echo_upstream, unused_address};

struct RunningProxy {
    addr: SocketAddr,
    shutdown: Shutdown,
    config_tx: mpsc::UnboundedSender<RouterConfig>,
    handle: tokio::task::JoinHandle<Result<(), std::io::Error>>,
}

async fn start_proxy(config: RouterConfig) -> RunningProxy {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let (config_tx, config_rx) = mpsc::unbounded_channel();

    let server = HttpServer::new(config);
    let handle = tokio::spawn(server.run(listener, config_rx, shutdown.subscribe()));

    RunningProxy {
        addr,
        shutdown,
        config_tx,
        handle,
    }
}

async fn get(addr: SocketAddr, path: &str) -> (u16, String) {
    let response = reqwest::get(format!("http://{addr}{path}")).await.unwrap();
    (response.status().as_u16(), response.text().await.unwrap())
}

#[tokio::test]
async fn test_upstream_receives_rewritten_target() {
    let upstream = start_echo_upstream().await;
    let proxy = start_proxy(single_site_config(upstream)).await;

    let (status, target) = get(proxy.addr, "/products/household/shoes,boots").await;
    assert_eq!(status, 200);
    assert_eq!(
        target,
        "/products?tx_solr%5Bfilter%5D%5Bcategory%5D=household\
         &tx_solr%5Bfilter%5D%5B0%5D=type%3Ashoes\
         &tx_solr%5Bfilter%5D%5B1%5D=type%3Aboots"
    );

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn test_unrouted_requests_are_forwarded_unchanged() {
    let upstream = start_echo_upstream().await;
    let proxy = start_proxy(single_site_config(upstream)).await;

    let (_, target) = get(proxy.addr, "/about/team?lang=de").await;
    assert_eq!(target, "/about/team?lang=de");

    let (_, target) = get(proxy.addr, "/products").await;
    assert_eq!(target, "/products");

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn test_response_carries_request_id() {
    let upstream = start_echo_upstream().await;
    let proxy = start_proxy(single_site_config(upstream)).await;

    let response = reqwest::get(format!("http://{}/products", proxy.addr))
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_upstream_returns_bad_gateway() {
    let upstream = unused_address().await;
    let proxy = start_proxy(single_site_config(upstream)).await;

    let (status, body) = get(proxy.addr, "/products/household/shoes").await;
    assert_eq!(status, 502);
    assert_eq!(body, "Upstream request failed");

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn test_config_update_swaps_sites() {
    let upstream = start_echo_upstream().await;
    let proxy = start_proxy(single_site_config(upstream)).await;

    let (_, target) = get(proxy.addr, "/products/household/shoes").await;
    assert!(target.starts_with("/products?"));

    let mut reloaded = single_site_config(upstream);
    reloaded.sites[0].route_enhancers = serde_json::Value::Null;
    proxy.config_tx.send(reloaded).unwrap();

    let mut target = String::new();
    for _ in 0..50 {
        target = get(proxy.addr, "/products/household/shoes").await.1;
        if target == "/products/household/shoes" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(target, "/products/household/shoes");

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn test_shutdown_stops_server() {
    let upstream = start_echo_upstream().await;
    let proxy = start_proxy(single_site_config(upstream)).await;

    let (status, _) = get(proxy.addr, "/").await;
    assert_eq!(status, 200);

    proxy.shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), proxy.handle)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
}
