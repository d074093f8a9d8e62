//! Minimum-interval guard between successful syncs.
//!
//! The limiter only remembers the time of the last *successful* sync.
//! Checking does not reserve anything, so two overlapping invocations can both
//! pass before either records success. That race is accepted: a rare duplicate
//! point on the server is preferred over a missed one.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use geosync_domain::constants::MIN_SAVE_INTERVAL;

/// Process-lifetime rate limiter; starts at 0 so the first attempt always
/// passes.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval_ms: i64,
    last_save_ms: AtomicI64,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(MIN_SAVE_INTERVAL)
    }
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        let min_interval_ms = i64::try_from(min_interval.as_millis()).unwrap_or(i64::MAX);
        Self { min_interval_ms, last_save_ms: AtomicI64::new(0) }
    }

    /// Whether an attempt at `now_ms` (unix millis) may proceed.
    ///
    /// A wall clock that moved behind the last success re-anchors that
    /// success to `now_ms` and lets the attempt through, otherwise syncing
    /// would stall until the clock caught up again.
    pub fn try_acquire(&self, now_ms: i64) -> bool {
        let last = self.last_save_ms.load(Ordering::Acquire);
        if now_ms < last {
            let _ = self.last_save_ms.compare_exchange(
                last,
                now_ms,
                Ordering::AcqRel,
                Ordering::Acquire,
            );
            return true;
        }
        now_ms.saturating_sub(last) >= self.min_interval_ms
    }

    /// Milliseconds since the last recorded success.
    pub fn elapsed(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.last_save_ms.load(Ordering::Acquire))
    }

    /// Record a confirmed success. Never moves the timestamp backwards.
    pub fn record_success(&self, now_ms: i64) {
        self.last_save_ms.fetch_max(now_ms, Ordering::AcqRel);
    }

    pub fn last_save_ms(&self) -> i64 {
        self.last_save_ms.load(Ordering::Acquire)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(u64::try_from(self.min_interval_ms).unwrap_or(0))
    }

    /// Forget the last success, as a process restart would.
    pub fn reset(&self) {
        self.last_save_ms.store(0, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_709_251_200_000; // 2024-03-01T00:00:00Z

    #[test]
    fn first_attempt_always_allowed() {
        let limiter = RateLimiter::default();
        assert!(limiter.try_acquire(T0));
        assert_eq!(limiter.last_save_ms(), 0);
    }

    #[test]
    fn blocks_until_floor_elapsed() {
        let limiter = RateLimiter::default();
        limiter.record_success(T0);

        assert!(!limiter.try_acquire(T0 + 1_000));
        assert!(!limiter.try_acquire(T0 + 54_999));
        assert!(limiter.try_acquire(T0 + 55_000));
        assert_eq!(limiter.elapsed(T0 + 30_000), 30_000);
    }

    #[test]
    fn checking_does_not_advance() {
        let limiter = RateLimiter::default();
        limiter.record_success(T0);

        let _ = limiter.try_acquire(T0 + 60_000);
        assert_eq!(limiter.last_save_ms(), T0);
    }

    #[test]
    fn record_success_is_monotonic() {
        let limiter = RateLimiter::default();
        limiter.record_success(T0 + 10_000);
        limiter.record_success(T0);
        assert_eq!(limiter.last_save_ms(), T0 + 10_000);
    }

    #[test]
    fn backwards_clock_reanchors_instead_of_stalling() {
        let limiter = RateLimiter::default();
        limiter.record_success(T0 + 600_000);

        assert!(limiter.try_acquire(T0));
        assert_eq!(limiter.last_save_ms(), T0);

        limiter.record_success(T0);
        assert!(!limiter.try_acquire(T0 + 1_000));
        assert!(limiter.try_acquire(T0 + 55_000));
    }

    #[test]
    fn reset_reopens_the_gate() {
        let limiter = RateLimiter::new(Duration::from_secs(55));
        limiter.record_success(T0);
        assert!(!limiter.try_acquire(T0 + 1));

        limiter.reset();
        assert!(limiter.try_acquire(T0 + 1));
        assert_eq!(limiter.min_interval(), Duration::from_secs(55));
    }
}
