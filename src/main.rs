//! facet-router
//!
//! Sits in front of a CMS and rewrites SEO-friendly listing paths such as
//! `/products/household/shoes` into the page slug plus `tx_solr` query
//! parameters the search plugin understands.
//!
//! ```text
//!     Client ──▶ request id ──▶ trace ──▶ timeout ──▶ facet routing ──▶ forward ──▶ CMS
//!                                                          │
//!                                               SiteRegistry (ArcSwap)
//!                                                          ▲
//!                                               ConfigWatcher (--watch)
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use facet_router::config::{load_config, ConfigWatcher, RouterConfig};
use facet_router::lifecycle::Shutdown;
use facet_router::observability::{logging, metrics};
use facet_router::query::{encode_query, parse_query};
use facet_router::routing::{RequestRewriter, RewriteOutcome};
use facet_router::site::SiteRegistry;
use facet_router::HttpServer;

#[derive(Parser)]
#[command(name = "facet-router")]
#[command(about = "Rewrites facet paths into search query parameters", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload sites when the configuration file changes.
    #[arg(short, long)]
    watch: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the routing proxy (default)
    Serve,
    /// Show how a single URL would be routed
    Resolve {
        /// Absolute URL, e.g. https://shop.example.com/products/household
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    logging::init_logging(&config.observability);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, cli.config, cli.watch).await,
        Command::Resolve { url } => resolve(&config, &url),
    }
}

async fn serve(
    config: RouterConfig,
    config_path: Option<PathBuf>,
    watch: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        sites = config.sites.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = std::sync::Arc::new(Shutdown::new());
    let shutdown_rx = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move { signal_shutdown.trigger_on_signal().await });

    // The watcher stops when dropped, so it lives until serve returns.
    let (_watcher, config_updates) = match (watch, config_path) {
        (true, Some(path)) => {
            let (watcher, updates) = ConfigWatcher::new(&path);
            (Some(watcher.run()?), updates)
        }
        (true, None) => {
            tracing::warn!("--watch needs --config, hot reload disabled");
            (None, mpsc::unbounded_channel().1)
        }
        (false, _) => (None, mpsc::unbounded_channel().1),
    };

    HttpServer::new(config)
        .run(listener, config_updates, shutdown_rx)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn resolve(config: &RouterConfig, raw_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let url = url::Url::parse(raw_url)?;
    let host = url.host_str().unwrap_or_default();
    let query = url.query().map(parse_query).unwrap_or_default();

    let registry = SiteRegistry::from_config(&config.sites);
    let outcome = RequestRewriter::from_registry(&registry).process(host, url.path(), &query);

    let report = match &outcome {
        RewriteOutcome::PassThrough(_) => json!({
            "outcome": outcome.label(),
            "path": url.path(),
            "query": query.to_json(),
            "query_string": encode_query(&query),
        }),
        RewriteOutcome::Rewrite(rewritten) => json!({
            "outcome": outcome.label(),
            "page_id": rewritten.page_id,
            "path": rewritten.path,
            "query": rewritten.query.to_json(),
            "query_string": encode_query(&rewritten.query),
        }),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
