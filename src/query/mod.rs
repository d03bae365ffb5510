//! Query parameter tree.
//!
//! # Data Flow
//! ```text
//! raw query string ("tx_solr[filter][0]=color:red")
//!     → codec.rs (decode bracket notation)
//!     → tree.rs (QueryMap, merged with the routed arguments)
//!     → codec.rs (re-encode for the rewritten URI)
//! ```
//!
//! # Design Decisions
//! - Sequences are maps with integer keys, the same shape the search layer
//!   decodes from bracket notation
//! - Maps keep insertion order so encoded output is stable
//! - Merging appends at sequence level and never drops existing entries

pub mod codec;
pub mod tree;

pub use codec::{encode_query, parse_query};
pub use tree::{QueryMap, QueryValue};
