//! Error types for the rate limiter

use thiserror::Error;

/// Result type alias for rate limiter operations
pub type Result<T> = std::result::Result<T, RateLimitError>;

/// Errors that can occur while configuring a rate limiter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RateLimitError {
    /// The policy string could not be parsed
    #[error("Invalid rate limit policy '{policy}': {reason}")]
    InvalidPolicy { policy: String, reason: String },
}

impl RateLimitError {
    /// Create an invalid policy error
    pub fn invalid_policy(policy: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPolicy {
            policy: policy.into(),
            reason: reason.into(),
        }
    }
}
