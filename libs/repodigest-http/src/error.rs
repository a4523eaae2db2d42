//! Errors raised while setting up the HTTP adapter

use thiserror::Error;

/// Result type alias for adapter construction
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Errors that can occur while building an [`HttpQueryProcessor`](crate::HttpQueryProcessor)
#[derive(Error, Debug)]
pub enum AdapterError {
    /// The configured base URL is not an absolute http(s) URL
    #[error("Invalid query processor URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

impl AdapterError {
    /// Create an invalid base URL error
    pub fn invalid_base_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBaseUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
