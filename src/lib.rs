//! Facet routing proxy: turns SEO-friendly listing paths into `tx_solr`
//! query parameters before requests reach the CMS.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod query;
pub mod routing;
pub mod site;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use query::{QueryMap, QueryValue};
pub use routing::{RequestRewriter, RewriteOutcome};
pub use site::SiteRegistry;
