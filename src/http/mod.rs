//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → middleware/rewrite.rs (facet routing, query parameters)
//!     → server.rs forward_handler (upstream CMS)
//!     → Send to client
//! ```

pub mod middleware;
pub mod server;

pub use middleware::{QueryParameters, RewriteState};
pub use server::HttpServer;
