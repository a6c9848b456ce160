//! Adaptive cache lifetime

use crate::analysis::EnrichedEvent;
use chrono::{DateTime, Duration, Utc};

/// Computes the advisory TTL for an analysis result
///
/// Events starting soon move fast, so a result containing one gets the short
/// TTL. The value is a hint for downstream HTTP caches; it does not gate
/// [`super::OddsCache`].
#[derive(Debug, Clone)]
pub struct FreshnessPolicy {
    /// How far ahead an event counts as "starting soon"
    pub soon_window: Duration,
    /// TTL while any event starts soon
    pub ttl_min: Duration,
    /// TTL otherwise
    pub ttl_max: Duration,
    /// TTL for an empty event list
    pub default_ttl: Duration,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            soon_window: Duration::minutes(90),
            ttl_min: Duration::seconds(120),
            ttl_max: Duration::seconds(600),
            default_ttl: Duration::seconds(300),
        }
    }
}

impl FreshnessPolicy {
    /// TTL for the given events at `now`
    pub fn ttl_for(&self, events: &[EnrichedEvent], now: DateTime<Utc>) -> Duration {
        ttl_for(
            events,
            now,
            self.soon_window,
            self.ttl_min,
            self.ttl_max,
            self.default_ttl,
        )
    }
}

/// `ttl_min` if any event starts within `[now, now + soon_window]`, `ttl_max`
/// otherwise, `default_ttl` when there are no events. Events with an unknown
/// start time are ignored.
pub fn ttl_for(
    events: &[EnrichedEvent],
    now: DateTime<Utc>,
    soon_window: Duration,
    ttl_min: Duration,
    ttl_max: Duration,
    default_ttl: Duration,
) -> Duration {
    if events.is_empty() {
        return default_ttl;
    }

    let starts_soon = events
        .iter()
        .filter_map(|event| event.commence_time)
        .any(|start| {
            let until_start = start - now;
            until_start >= Duration::zero() && until_start <= soon_window
        });

    if starts_soon {
        ttl_min
    } else {
        ttl_max
    }
}
