//! Aggregation service types

use crate::analysis::{AnalysisResult, EnrichedEvent};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::sync::Arc;

/// Cache state of a sport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SportState {
    /// Nothing cached yet
    Cold,
    /// Cached and within the cache TTL
    Fresh,
    /// Cached but past the cache TTL
    Stale,
}

/// Where a response's data came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOrigin {
    /// Fresh cache entry, no upstream call
    Cache,
    /// Refreshed from upstream during this request
    Upstream,
    /// Refresh failed; previously cached data served
    StaleFallback,
    /// Refresh failed and nothing was cached
    Unavailable,
}

/// Result of an aggregation request
#[derive(Debug, Clone)]
pub struct OddsResponse {
    /// Resolved sport key
    pub sport: String,
    /// False when serving stale data or nothing at all
    pub fresh: bool,
    pub origin: ResponseOrigin,
    /// Shared analysis result; `None` only when unavailable
    pub result: Option<Arc<AnalysisResult>>,
    /// Advisory TTL for downstream caches
    pub advisory_ttl: Duration,
    pub served_at: DateTime<Utc>,
}

impl OddsResponse {
    /// Enriched events, empty when no data is available
    pub fn events(&self) -> &[EnrichedEvent] {
        self.result
            .as_deref()
            .map(|result| result.events.as_slice())
            .unwrap_or_default()
    }

    /// Fetch time of the served data
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.result.as_ref().map(|result| result.fetched_at)
    }

    /// Distinguishes "no data at all" from a successful empty result
    pub fn is_unavailable(&self) -> bool {
        self.origin == ResponseOrigin::Unavailable
    }
}

/// Aggregation service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Allowed sport keys; the first is the default
    pub sports: Vec<String>,
    /// Age after which a cached result is revalidated
    pub cache_ttl: Duration,
    /// Cap on upstream fetches per sport per second
    pub upstream_per_second: Option<u32>,
    /// Minimum arbitrage margin (percent) that triggers an alert
    pub alert_min_margin: Decimal,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            sports: vec!["soccer_epl".to_string()],
            cache_ttl: Duration::seconds(300),
            upstream_per_second: None,
            alert_min_margin: dec!(3.0),
        }
    }
}
