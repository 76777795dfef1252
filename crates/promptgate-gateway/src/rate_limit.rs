//! Fixed-window request counter keyed by client identity.
//!
//! Each key owns a window `{started, count}`. The read-check-increment for a
//! key happens under the `DashMap` shard lock held by `entry()`, so two
//! concurrent requests from the same client can never both observe room in
//! the window. Bursts of up to ~2N around a window boundary are possible.

use std::time::{Duration, Instant};

use dashmap::DashMap;

#[derive(Clone, Copy, Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Outcome of one rate-limit check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    /// Configured maximum per window.
    pub limit: u32,
    /// Requests left in the current window.
    pub remaining: u32,
    /// Time until the current window ends.
    pub reset_after: Duration,
}

impl RateDecision {
    /// `reset_after` rounded up to whole seconds, for response headers.
    pub fn reset_secs(&self) -> u64 {
        let secs = self.reset_after.as_secs();
        if self.reset_after.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        }
    }
}

pub struct FixedWindowLimiter {
    window: Duration,
    max_requests: u32,
    windows: DashMap<String, Window>,
}

impl FixedWindowLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            windows: DashMap::new(),
        }
    }

    /// `RateLimit-Policy` value, e.g. `10;w=60`.
    pub fn policy(&self) -> String {
        format!("{};w={}", self.max_requests, self.window.as_secs())
    }

    /// Count one request from `key` against the current window.
    pub fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }

    /// [`check`](Self::check) with an explicit clock reading.
    ///
    /// A rejected attempt still increments the count so the window does
    /// not reset early.
    pub fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        let mut entry = self
            .windows
            .entry(key.to_string())
            .or_insert(Window {
                started: now,
                count: 0,
            });

        if now.saturating_duration_since(entry.started) > self.window {
            entry.started = now;
            entry.count = 0;
        }
        entry.count = entry.count.saturating_add(1);

        // Window lengths near `Duration::MAX` must not overflow `Instant`.
        let elapsed = now.saturating_duration_since(entry.started);
        let reset_after = self.window.saturating_sub(elapsed);
        RateDecision {
            allowed: entry.count <= self.max_requests,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(entry.count),
            reset_after,
        }
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_admits_up_to_limit() {
        let limiter = FixedWindowLimiter::new(Duration::from_secs(60), 3);
        let now = Instant::now();

        let remaining: Vec<u32> = (0..3)
            .map(|_| {
                let d = limiter.check_at("10.0.0.1", now);
                assert!(d.allowed);
                d.remaining
            })
            .collect();
        assert_eq!(remaining, vec![2, 1, 0]);

        let rejected = limiter.check_at("10.0.0.1", now);
        assert!(!rejected.allowed);
        assert_eq!(rejected.remaining, 0);
        assert_eq!(rejected.limit, 3);
    }

    #[test]
    fn test_window_resets_after_expiry() {
        let limiter = FixedWindowLimiter::new(Duration::from_secs(60), 1);
        let start = Instant::now();

        assert!(limiter.check_at("k", start).allowed);
        assert!(!limiter.check_at("k", start + Duration::from_secs(30)).allowed);
        // Still inside the window at exactly its length.
        assert!(!limiter.check_at("k", start + Duration::from_secs(60)).allowed);
        assert!(limiter.check_at("k", start + Duration::from_secs(61)).allowed);
    }

    #[test]
    fn test_rejection_does_not_restart_window() {
        let limiter = FixedWindowLimiter::new(Duration::from_secs(10), 1);
        let start = Instant::now();

        limiter.check_at("k", start);
        let d = limiter.check_at("k", start + Duration::from_secs(4));
        assert!(!d.allowed);
        assert_eq!(d.reset_after, Duration::from_secs(6));
        assert_eq!(d.reset_secs(), 6);
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = FixedWindowLimiter::new(Duration::from_secs(60), 1);
        let now = Instant::now();

        assert!(limiter.check_at("a", now).allowed);
        assert!(!limiter.check_at("a", now).allowed);
        assert!(limiter.check_at("b", now).allowed);
        assert_eq!(limiter.tracked_keys(), 2);
    }

    #[test]
    fn test_huge_window_saturates() {
        let limiter = FixedWindowLimiter::new(Duration::from_secs(u64::MAX), 1);
        let now = Instant::now();

        let first = limiter.check_at("k", now);
        assert!(first.allowed);
        assert_eq!(first.reset_after, Duration::from_secs(u64::MAX));

        let later = limiter.check_at("k", now + Duration::from_secs(5));
        assert!(!later.allowed);
        assert_eq!(later.reset_after, Duration::from_secs(u64::MAX - 5));
    }

    #[test]
    fn test_policy() {
        let limiter = FixedWindowLimiter::new(Duration::from_secs(60), 10);
        assert_eq!(limiter.policy(), "10;w=60");
    }

    #[test]
    fn test_reset_secs_rounds_up() {
        let decision = RateDecision {
            allowed: true,
            limit: 10,
            remaining: 9,
            reset_after: Duration::from_millis(59_001),
        };
        assert_eq!(decision.reset_secs(), 60);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_checks_never_exceed_limit() {
        let limiter = Arc::new(FixedWindowLimiter::new(Duration::from_secs(60), 10));

        let handles: Vec<_> = (0..64)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move { limiter.check("same-client").allowed })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 10);
    }
}
