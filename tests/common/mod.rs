//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;

use facet_router::config::{parse_config, RouterConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const SHOP_HOST: &str = "shop.example.com";
pub const BLOG_HOST: &str = "blog.example.com";

const SITES: &str = r#"
[[sites]]
identifier = "shop"
base = "https://shop.example.com/"
pages = [
  { id = 1, slug = "/" },
  { id = 10, slug = "/products" },
  { id = 11, slug = "/about" },
  { id = 12, slug = "/brands" },
]

[sites.route_enhancers.Products]
type = "CombinedFacetEnhancer"
limitToPages = [10]
routePath = "/{category}/{facet}"

[sites.route_enhancers.Products._arguments]
category = "filter/category"
facet = "filter-type"

[sites.route_enhancers.Products.solr]
facetValueSeparator = ","

[sites.route_enhancers.Brands]
type = "CombinedFacetEnhancer"
limitToPages = ["12"]
routePath = "/{brand}"
extensionKey = "tx_search"

[sites.route_enhancers.Brands._arguments]
brand = "filter-brand"

[sites.route_enhancers.Brands.solr]
facetValueSeparator = "+"

[[sites]]
identifier = "blog"
base = "https://blog.example.com/"
pages = [
  { id = 20, slug = "/" },
  { id = 21, slug = "/posts" },
]
"#;

/// Two sites; only the shop declares facet enhancers.
pub fn sample_config() -> RouterConfig {
    parse_config(SITES).expect("sample config is valid")
}

/// The shop alone, which then answers for every host.
pub fn single_site_config(upstream: SocketAddr) -> RouterConfig {
    let mut config = sample_config();
    config.sites.retain(|site| site.identifier == "shop");
    config.upstream.address = upstream.to_string();
    config
}

/// Start an HTTP/1.1 upstream that answers every request with its request-target.
pub async fn start_echo_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }

                let head = String::from_utf8_lossy(&head);
                let target = head
                    .lines()
                    .next()
                    .and_then(|line| line.split(' ').nth(1))
                    .unwrap_or("")
                    .to_string();

                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    target.len(),
                    target
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn unused_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
