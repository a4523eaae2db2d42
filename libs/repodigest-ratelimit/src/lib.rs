//! Per-client rate limiting for RepoDigest
//!
//! A [`RateLimiter`] is created once at startup, shared by every request task,
//! and consulted before a rate limited handler runs. The provided
//! [`SlidingWindowLimiter`] keeps its counters in memory, so limits are per
//! process.
//!
//! ```rust
//! use repodigest_ratelimit::{RateLimiter, RatePolicy, SlidingWindowLimiter};
//!
//! let policy: RatePolicy = "10/minute".parse().unwrap();
//! let limiter = SlidingWindowLimiter::new(policy);
//! assert!(limiter.check("203.0.113.7").is_allowed());
//! ```

mod error;
mod limiter;
mod policy;

pub use error::{RateLimitError, Result};
pub use limiter::{Admission, RateLimiter, SlidingWindowLimiter};
pub use policy::RatePolicy;

#[cfg(any(test, feature = "mocks"))]
pub use limiter::MockRateLimiter;
