//! # RepoDigest HTTP Adapter
//!
//! Implements the domain's `QueryProcessor` port against a remote query
//! processing service reachable over HTTP.

mod error;
pub mod infrastructure;

pub use error::{AdapterError, Result};
pub use infrastructure::HttpQueryProcessor;
