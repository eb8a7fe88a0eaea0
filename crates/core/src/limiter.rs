//! Sliding-window admission control for outbound AI calls.
//!
//! Each key owns an ascending list of admission timestamps. The window is
//! revalidated lazily on every check; there is no background task. Idle keys
//! are swept inline, at most once per window length.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Limiter settings, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Admissions allowed per window. Must be greater than 0.
    pub max_requests: usize,
    /// Window length in milliseconds. Must be greater than 0.
    pub window_ms: u64,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { max_requests: 10, window_ms: 60_000 }
    }
}

/// Per-key sliding-window limiter.
///
/// Check-and-append for a key runs under one mutex, so concurrent callers
/// for the same key cannot both slip into the last free slot. Keys whose
/// window has emptied are dropped, so idle keys do not accumulate.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    history: Mutex<History>,
}

#[derive(Debug)]
struct History {
    keys: HashMap<String, VecDeque<Instant>>,
    last_sweep: Instant,
}

impl History {
    /// Drop every key with no timestamp left in the window. Runs at most
    /// once per window length.
    fn sweep(&mut self, now: Instant, window: Duration) {
        if now.saturating_duration_since(self.last_sweep) < window {
            return;
        }
        let before = self.keys.len();
        self.keys.retain(|_, stamps| {
            prune(stamps, now, window);
            !stamps.is_empty()
        });
        self.last_sweep = now;
        if self.keys.len() < before {
            tracing::debug!(dropped = before - self.keys.len(), kept = self.keys.len(), "swept idle limiter keys");
        }
    }

    /// Pruned timestamps for `key`; an emptied key is removed.
    fn pruned(&mut self, key: &str, now: Instant, window: Duration) -> Option<&VecDeque<Instant>> {
        let stamps = self.keys.get_mut(key)?;
        prune(stamps, now, window);
        if stamps.is_empty() {
            self.keys.remove(key);
            return None;
        }
        self.keys.get(key)
    }
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self { config, history: Mutex::new(History { keys: HashMap::new(), last_sweep: Instant::now() }) }
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// Admit one unit of work for `key`, or say how long to wait.
    ///
    /// On admission the attempt is recorded. On denial nothing is recorded
    /// and the error holds the time until the oldest admission leaves the
    /// window, computed under the same lock as the decision.
    pub async fn check(&self, key: &str) -> Result<(), Duration> {
        let now = Instant::now();
        let window = self.config.window();
        let mut history = self.history.lock().await;
        history.sweep(now, window);

        if let Some(stamps) = history.pruned(key, now, window)
            && stamps.len() >= self.config.max_requests
        {
            tracing::debug!(key, in_window = stamps.len(), "rate limit reached");
            return Err(wait_for_slot(stamps, now, window));
        }

        history.keys.entry(key.to_string()).or_default().push_back(now);
        Ok(())
    }

    /// Decide whether a new unit of work for `key` must wait.
    ///
    /// Returns `false` and records the attempt when admitted. Returns `true`
    /// without recording anything when the window is full.
    pub async fn is_limited(&self, key: &str) -> bool {
        self.check(key).await.is_err()
    }

    /// Admissions still available for `key` in the current window.
    pub async fn remaining(&self, key: &str) -> usize {
        let now = Instant::now();
        let mut history = self.history.lock().await;
        let used = history.pruned(key, now, self.config.window()).map_or(0, VecDeque::len);
        self.config.max_requests.saturating_sub(used)
    }

    /// Time until `key` is admitted again, or None if it is not limited.
    pub async fn retry_after(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        let window = self.config.window();
        let mut history = self.history.lock().await;
        let stamps = history.pruned(key, now, window)?;
        (stamps.len() >= self.config.max_requests).then(|| wait_for_slot(stamps, now, window))
    }

    /// Forget all history for `key`.
    pub async fn reset(&self, key: &str) {
        self.history.lock().await.keys.remove(key);
    }
}

/// The slot frees once the oldest admission falls out of the window; the
/// extra millisecond steps past the inclusive bound.
fn wait_for_slot(stamps: &VecDeque<Instant>, now: Instant, window: Duration) -> Duration {
    let oldest = stamps.front().copied().unwrap_or(now);
    (oldest + window).saturating_duration_since(now) + Duration::from_millis(1)
}

/// Drop timestamps older than `now - window`; the bound itself is kept.
fn prune(stamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    let Some(cutoff) = now.checked_sub(window) else {
        return;
    };
    while stamps.front().is_some_and(|t| *t < cutoff) {
        stamps.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    fn limiter(max_requests: usize, window_ms: u64) -> RateLimiter {
        RateLimiter::new(RateLimitConfig { max_requests, window_ms })
    }

    #[tokio::test(start_paused = true)]
    async fn test_fourth_call_in_window_denied() {
        let limiter = limiter(3, 1000);

        assert!(!limiter.is_limited("k").await);
        advance(Duration::from_millis(100)).await;
        assert!(!limiter.is_limited("k").await);
        advance(Duration::from_millis(100)).await;
        assert!(!limiter.is_limited("k").await);
        advance(Duration::from_millis(100)).await;
        assert!(limiter.is_limited("k").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_admitted_once_oldest_leaves_window() {
        let limiter = limiter(3, 1000);
        for _ in 0..3 {
            assert!(!limiter.is_limited("k").await);
            advance(Duration::from_millis(100)).await;
        }
        // t = 300
        assert!(limiter.is_limited("k").await);

        advance(Duration::from_millis(750)).await;
        // t = 1050: the t=0 admission is outside the window
        assert!(!limiter.is_limited("k").await);
        // 100, 200 and 1050 are in the window now
        assert!(limiter.is_limited("k").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_denied_attempts_are_not_recorded() {
        let limiter = limiter(1, 1000);
        assert!(!limiter.is_limited("k").await);
        for _ in 0..5 {
            advance(Duration::from_millis(100)).await;
            assert!(limiter.is_limited("k").await);
        }
        // Only the t=0 admission counts, so the slot frees at t=1000.
        advance(Duration::from_millis(501)).await;
        assert!(!limiter.is_limited("k").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timestamp_on_window_edge_still_counts() {
        let limiter = limiter(1, 1000);
        assert!(!limiter.is_limited("k").await);
        advance(Duration::from_millis(1000)).await;
        assert!(limiter.is_limited("k").await);
        advance(Duration::from_millis(1)).await;
        assert!(!limiter.is_limited("k").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let limiter = limiter(1, 1000);
        assert!(!limiter.is_limited("alice").await);
        assert!(limiter.is_limited("alice").await);
        assert!(!limiter.is_limited("bob").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_clears_history() {
        let limiter = limiter(2, 1000);
        assert!(!limiter.is_limited("k").await);
        assert!(!limiter.is_limited("k").await);
        assert!(limiter.is_limited("k").await);

        limiter.reset("k").await;
        assert_eq!(limiter.remaining("k").await, 2);
        assert!(!limiter.is_limited("k").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remaining_and_retry_after() {
        let limiter = limiter(2, 1000);
        assert_eq!(limiter.remaining("k").await, 2);
        assert_eq!(limiter.retry_after("k").await, None);

        assert!(!limiter.is_limited("k").await);
        advance(Duration::from_millis(400)).await;
        assert!(!limiter.is_limited("k").await);
        assert_eq!(limiter.remaining("k").await, 0);

        advance(Duration::from_millis(100)).await;
        // oldest admission (t=0) leaves the window just after t=1000
        assert_eq!(limiter.retry_after("k").await, Some(Duration::from_millis(501)));

        advance(Duration::from_millis(501)).await;
        assert_eq!(limiter.retry_after("k").await, None);
        assert_eq!(limiter.remaining("k").await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_checks_respect_limit() {
        let limiter = std::sync::Arc::new(limiter(5, 1000));
        let mut handles = Vec::new();
        for _ in 0..20 {
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move { limiter.is_limited("shared").await }));
        }

        let mut admitted = 0;
        for handle in handles {
            if !handle.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_reports_wait_on_denial() {
        let limiter = limiter(1, 1000);
        assert_eq!(limiter.check("k").await, Ok(()));
        advance(Duration::from_millis(250)).await;
        assert_eq!(limiter.check("k").await, Err(Duration::from_millis(751)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_keys_are_dropped() {
        let limiter = limiter(1, 1000);
        for i in 0..10_000 {
            assert!(!limiter.is_limited(&format!("user-{i}")).await);
        }
        assert_eq!(limiter.history.lock().await.keys.len(), 10_000);

        advance(Duration::from_secs(3600)).await;
        assert!(!limiter.is_limited("late").await);
        assert_eq!(limiter.history.lock().await.keys.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_emptied_key_removed_on_read() {
        let limiter = limiter(2, 1000);
        assert!(!limiter.is_limited("k").await);
        advance(Duration::from_millis(1001)).await;

        assert_eq!(limiter.remaining("k").await, 2);
        assert!(!limiter.history.lock().await.keys.contains_key("k"));
        assert_eq!(limiter.retry_after("k").await, None);
    }
}
