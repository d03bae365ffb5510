//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! middleware, proxy handler
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - The forwarding handler logs the `x-request-id` set by the outer layer
//! - Pass-through reasons are logged at debug, failures at warn

pub mod logging;
pub mod metrics;
