//! In-memory sliding window limiter

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::policy::RatePolicy;

/// Decision for a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The request was admitted and counted
    Allowed { remaining: u32 },
    /// The client is over its budget; nothing was counted
    Denied { retry_after: Duration },
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed { .. })
    }
}

/// Gate consulted before a rate limited request is handled
///
/// Implementations are shared by every request task and must serialize
/// access to their counters themselves.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait RateLimiter: Send + Sync {
    /// Count a request from `client` if it is within budget
    fn check(&self, client: &str) -> Admission;

    /// The policy enforced by this limiter
    fn policy(&self) -> RatePolicy;
}

/// Sliding window limiter keyed by client identity
///
/// For every client the timestamps of admitted requests inside the current
/// window are kept. A request is admitted while fewer than
/// `max_requests` timestamps are younger than `window`. State is only ever
/// dropped by window expiry.
pub struct SlidingWindowLimiter {
    policy: RatePolicy,
    hits: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl SlidingWindowLimiter {
    pub fn new(policy: RatePolicy) -> Self {
        Self {
            policy,
            hits: Mutex::new(HashMap::new()),
        }
    }

    fn hits(&self) -> MutexGuard<'_, HashMap<String, VecDeque<Instant>>> {
        // A panic while holding the lock cannot leave the table inconsistent
        self.hits.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Same as [`RateLimiter::check`] with an explicit clock reading
    pub fn check_at(&self, client: &str, now: Instant) -> Admission {
        let window = self.policy.window();
        let max_requests = self.policy.max_requests() as usize;

        let mut hits = self.hits();
        let timestamps = hits.entry(client.to_string()).or_default();
        evict_expired(timestamps, now, window);

        if timestamps.len() < max_requests {
            timestamps.push_back(now);
            Admission::Allowed {
                remaining: (max_requests - timestamps.len()) as u32,
            }
        } else {
            let retry_after = timestamps
                .front()
                .map(|oldest| (*oldest + window).saturating_duration_since(now))
                .unwrap_or(window);
            debug!(client = %client, retry_after_ms = retry_after.as_millis() as u64, "Rate limit exceeded");
            Admission::Denied { retry_after }
        }
    }

    /// Drop expired timestamps and forget idle clients
    ///
    /// Returns the number of clients forgotten.
    pub fn purge_at(&self, now: Instant) -> usize {
        let window = self.policy.window();
        let mut hits = self.hits();
        let before = hits.len();

        hits.retain(|_, timestamps| {
            evict_expired(timestamps, now, window);
            !timestamps.is_empty()
        });

        before - hits.len()
    }

    pub fn purge(&self) -> usize {
        self.purge_at(Instant::now())
    }

    /// Number of clients with requests inside the current window
    pub fn tracked_clients(&self) -> usize {
        self.hits().len()
    }
}

fn evict_expired(timestamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = timestamps.front() {
        if now.saturating_duration_since(*oldest) >= window {
            timestamps.pop_front();
        } else {
            break;
        }
    }
}

impl RateLimiter for SlidingWindowLimiter {
    fn check(&self, client: &str) -> Admission {
        self.check_at(client, Instant::now())
    }

    fn policy(&self) -> RatePolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn limiter(max_requests: u32) -> SlidingWindowLimiter {
        SlidingWindowLimiter::new(RatePolicy::per_minute(max_requests).unwrap())
    }

    #[test]
    fn test_admits_up_to_budget() {
        let limiter = limiter(3);
        let now = Instant::now();

        assert_eq!(limiter.check_at("10.0.0.1", now), Admission::Allowed { remaining: 2 });
        assert_eq!(limiter.check_at("10.0.0.1", now), Admission::Allowed { remaining: 1 });
        assert_eq!(limiter.check_at("10.0.0.1", now), Admission::Allowed { remaining: 0 });
        assert!(!limiter.check_at("10.0.0.1", now).is_allowed());
    }

    #[test]
    fn test_default_policy_allows_ten_per_minute() {
        let limiter = limiter(10);
        let start = Instant::now();

        for i in 0..10 {
            let now = start + Duration::from_secs(i * 5);
            assert!(limiter.check_at("client", now).is_allowed(), "request {} denied", i);
        }
        assert!(!limiter.check_at("client", start + Duration::from_secs(59)).is_allowed());
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = limiter(1);
        let now = Instant::now();

        assert!(limiter.check_at("alice", now).is_allowed());
        assert!(!limiter.check_at("alice", now).is_allowed());
        assert!(limiter.check_at("bob", now).is_allowed());
    }

    #[test]
    fn test_window_rolls() {
        let limiter = limiter(2);
        let start = Instant::now();

        assert!(limiter.check_at("client", start).is_allowed());
        assert!(limiter.check_at("client", start + Duration::from_secs(30)).is_allowed());

        match limiter.check_at("client", start + Duration::from_secs(45)) {
            Admission::Denied { retry_after } => assert_eq!(retry_after, Duration::from_secs(15)),
            other => panic!("expected denial, got {:?}", other),
        }

        // Only the first request has left the window
        assert!(limiter.check_at("client", start + Duration::from_secs(60)).is_allowed());
        assert!(!limiter.check_at("client", start + Duration::from_secs(61)).is_allowed());
    }

    #[test]
    fn test_denied_requests_are_not_counted() {
        let limiter = limiter(1);
        let start = Instant::now();

        assert!(limiter.check_at("client", start).is_allowed());
        for s in 1..50 {
            assert!(!limiter.check_at("client", start + Duration::from_secs(s)).is_allowed());
        }
        assert!(limiter.check_at("client", start + Duration::from_secs(60)).is_allowed());
    }

    #[test]
    fn test_purge_forgets_idle_clients() {
        let limiter = limiter(5);
        let start = Instant::now();

        limiter.check_at("old", start);
        limiter.check_at("recent", start + Duration::from_secs(50));
        assert_eq!(limiter.tracked_clients(), 2);

        let forgotten = limiter.purge_at(start + Duration::from_secs(70));

        assert_eq!(forgotten, 1);
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn test_concurrent_checks_respect_budget() {
        let limiter = Arc::new(limiter(10));
        let now = Instant::now();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                thread::spawn(move || {
                    (0..5)
                        .filter(|_| limiter.check_at("shared", now).is_allowed())
                        .count()
                })
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 10);
    }

    #[test]
    fn test_mock_limiter() {
        let mut mock = MockRateLimiter::new();
        mock.expect_check()
            .withf(|client| client == "blocked")
            .returning(|_| Admission::Denied {
                retry_after: Duration::from_secs(5),
            });

        assert!(!mock.check("blocked").is_allowed());
    }
}
