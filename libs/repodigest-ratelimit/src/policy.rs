//! Rate limit policies such as `10/minute`

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{RateLimitError, Result};

/// How many requests a client may make within a rolling window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatePolicy {
    max_requests: u32,
    window: Duration,
}

impl RatePolicy {
    /// Create a policy
    ///
    /// # Errors
    ///
    /// Returns `RateLimitError::InvalidPolicy` if either value is zero
    pub fn new(max_requests: u32, window: Duration) -> Result<Self> {
        if max_requests == 0 {
            return Err(RateLimitError::invalid_policy(
                format!("{}/{:?}", max_requests, window),
                "request count must be positive",
            ));
        }
        if window.is_zero() {
            return Err(RateLimitError::invalid_policy(
                format!("{}/{:?}", max_requests, window),
                "window must be positive",
            ));
        }
        Ok(Self {
            max_requests,
            window,
        })
    }

    /// `max_requests` per rolling minute
    pub fn per_minute(max_requests: u32) -> Result<Self> {
        Self::new(max_requests, Duration::from_secs(60))
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

fn unit_seconds(unit: &str) -> Option<u64> {
    match unit {
        "second" | "seconds" | "s" => Some(1),
        "minute" | "minutes" | "m" => Some(60),
        "hour" | "hours" | "h" => Some(60 * 60),
        "day" | "days" | "d" => Some(24 * 60 * 60),
        _ => None,
    }
}

impl FromStr for RatePolicy {
    type Err = RateLimitError;

    /// Parses `<count>/<unit>`, e.g. `10/minute` or `100/hour`.
    fn from_str(s: &str) -> Result<Self> {
        let (count, unit) = s
            .split_once('/')
            .ok_or_else(|| RateLimitError::invalid_policy(s, "expected '<count>/<unit>'"))?;

        let max_requests = count
            .trim()
            .parse::<u32>()
            .map_err(|e| RateLimitError::invalid_policy(s, format!("bad count: {}", e)))?;

        let unit = unit.trim().to_ascii_lowercase();
        let seconds = unit_seconds(&unit)
            .ok_or_else(|| RateLimitError::invalid_policy(s, format!("unknown unit '{}'", unit)))?;

        Self::new(max_requests, Duration::from_secs(seconds))
            .map_err(|_| RateLimitError::invalid_policy(s, "request count must be positive"))
    }
}

impl fmt::Display for RatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.window.as_secs();
        let (amount, unit) = match secs {
            s if s > 0 && s % 86_400 == 0 => (s / 86_400, "day"),
            s if s > 0 && s % 3_600 == 0 => (s / 3_600, "hour"),
            s if s > 0 && s % 60 == 0 => (s / 60, "minute"),
            s => (s, "second"),
        };
        write!(f, "{} per {} {}", self.max_requests, amount, unit)
    }
}
