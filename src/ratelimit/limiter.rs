//! Keyed per-second admission control

use super::RateWindow;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Fixed-window rate limiter keyed by an opaque identity string
///
/// Each key owns its own mutex, so the read-check-increment sequence is
/// serialized per key while unrelated keys proceed independently. The map
/// itself is only locked long enough to fetch or insert a key's window.
#[derive(Debug, Default)]
pub struct RateLimiter {
    windows: DashMap<String, Arc<Mutex<RateWindow>>>,
}

impl RateLimiter {
    /// Create an empty limiter
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit one hit for `key` in the epoch second of `now`
    ///
    /// Returns false, without counting the hit, once `max_per_second` hits
    /// were already admitted in that second.
    pub fn allow(&self, key: &str, max_per_second: u32, now: DateTime<Utc>) -> bool {
        let window = self.window(key);
        let allowed = window.lock().try_hit(now.timestamp(), max_per_second);

        if !allowed {
            tracing::debug!(key, max_per_second, "Rate limit exceeded");
            crate::telemetry::increment_counter(crate::telemetry::CounterMetric::RateLimited);
        }
        allowed
    }

    /// Remove windows with no hits in the last two seconds
    ///
    /// A window still referenced by an in-flight `allow` is kept. Returns the
    /// number of windows removed.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let second = now.timestamp();
        let before = self.windows.len();
        self.windows.retain(|_, window| {
            if Arc::strong_count(window) > 1 {
                return true;
            }
            let mut window = window.lock();
            window.prune(second);
            window.latest_second().is_some()
        });
        before.saturating_sub(self.windows.len())
    }

    /// Number of tracked keys
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    fn window(&self, key: &str) -> Arc<Mutex<RateWindow>> {
        if let Some(window) = self.windows.get(key) {
            return Arc::clone(window.value());
        }
        Arc::clone(self.windows.entry(key.to_string()).or_default().value())
    }
}
