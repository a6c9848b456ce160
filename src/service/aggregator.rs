//! Request-driven refresh with stale fallback

use super::{OddsResponse, ResponseOrigin, ServiceConfig, SportState};
use crate::alert::{qualifying_alerts, AlertSink};
use crate::analysis::{AnalysisResult, MarketAnalyzer};
use crate::cache::{FreshnessPolicy, OddsCache};
use crate::data::SnapshotStore;
use crate::feed::{OddsFeed, UpstreamError};
use crate::ratelimit::RateLimiter;
use crate::telemetry::{
    increment_counter, record_latency, set_gauge, CounterMetric, GaugeMetric, LatencyMetric,
};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Serves analyzed odds per sport, refreshing from upstream on demand
///
/// A fresh cache entry is served as is. A missing or stale entry triggers
/// one upstream fetch per sport at a time; concurrent requests wait for it
/// and then read the refreshed entry. When the fetch fails, the previous
/// result is served with `fresh = false`.
pub struct AggregationService {
    feed: Arc<dyn OddsFeed>,
    analyzer: MarketAnalyzer,
    policy: FreshnessPolicy,
    config: ServiceConfig,
    cache: Arc<OddsCache>,
    limiter: Arc<RateLimiter>,
    store: Option<Arc<dyn SnapshotStore>>,
    alerts: Option<Arc<dyn AlertSink>>,
    refresh_locks: DashMap<String, Arc<Mutex<()>>>,
    alert_tasks: parking_lot::Mutex<JoinSet<()>>,
}

impl AggregationService {
    pub fn new(
        feed: Arc<dyn OddsFeed>,
        analyzer: MarketAnalyzer,
        policy: FreshnessPolicy,
        config: ServiceConfig,
    ) -> Self {
        Self {
            feed,
            analyzer,
            policy,
            config,
            cache: Arc::new(OddsCache::new()),
            limiter: Arc::new(RateLimiter::new()),
            store: None,
            alerts: None,
            refresh_locks: DashMap::new(),
            alert_tasks: parking_lot::Mutex::new(JoinSet::new()),
        }
    }

    /// Share an existing cache
    pub fn with_cache(mut self, cache: Arc<OddsCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Share an existing rate limiter
    pub fn with_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = limiter;
        self
    }

    /// Persist refreshed results and hydrate cold sports from `store`
    pub fn with_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Send surebet alerts for freshly fetched results
    pub fn with_alerts(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.alerts = Some(sink);
        self
    }

    pub fn cache(&self) -> &Arc<OddsCache> {
        &self.cache
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn policy(&self) -> &FreshnessPolicy {
        &self.policy
    }

    /// Map a requested sport onto the allow-list
    ///
    /// Unknown or missing keys fall back to the first enabled sport.
    pub fn resolve_sport(&self, requested: Option<&str>) -> String {
        let requested = requested.map(str::trim).filter(|s| !s.is_empty());

        if let Some(sport) = requested {
            if self.config.sports.iter().any(|s| s == sport) {
                return sport.to_string();
            }
        }

        match self.config.sports.first() {
            Some(default) => {
                if let Some(sport) = requested {
                    debug!(requested = sport, fallback = %default, "Unknown sport, using default");
                }
                default.clone()
            }
            None => requested.unwrap_or_default().to_string(),
        }
    }

    /// Cache state of a sport at `now`
    pub fn state(&self, sport: &str, now: DateTime<Utc>) -> SportState {
        match self.cache.get(sport) {
            None => SportState::Cold,
            Some(_) if self.cache.is_fresh(sport, now, self.config.cache_ttl) => SportState::Fresh,
            Some(_) => SportState::Stale,
        }
    }

    /// Serve odds for a sport at the current time
    pub async fn request(&self, sport: &str) -> OddsResponse {
        self.request_at(sport, Utc::now()).await
    }

    /// Serve odds for a sport as of `now`
    pub async fn request_at(&self, sport: &str, now: DateTime<Utc>) -> OddsResponse {
        let sport = self.resolve_sport(Some(sport));

        if let Some(response) = self.serve_fresh(&sport, now) {
            return response;
        }

        let lock = self.refresh_lock(&sport);
        let _guard = lock.lock().await;

        // The entry may have been refreshed or hydrated while waiting
        if self.cache.get(&sport).is_none() {
            self.hydrate(&sport).await;
        }
        if let Some(response) = self.serve_fresh(&sport, now) {
            return response;
        }

        increment_counter(CounterMetric::CacheMiss);

        match self.refresh(&sport, now).await {
            Ok(result) => self.respond(&sport, Some(result), true, ResponseOrigin::Upstream, now),
            Err(err) => {
                increment_counter(CounterMetric::UpstreamFailure);
                match self.cache.get(&sport) {
                    Some(stale) => {
                        warn!(
                            sport = %sport,
                            error = %err,
                            fetched_at = %stale.fetched_at,
                            "Refresh failed, serving stale result"
                        );
                        increment_counter(CounterMetric::StaleServed);
                        self.respond(&sport, Some(stale), false, ResponseOrigin::StaleFallback, now)
                    }
                    None => {
                        warn!(sport = %sport, error = %err, "Refresh failed, nothing cached");
                        increment_counter(CounterMetric::Unavailable);
                        self.respond(&sport, None, false, ResponseOrigin::Unavailable, now)
                    }
                }
            }
        }
    }

    fn serve_fresh(&self, sport: &str, now: DateTime<Utc>) -> Option<OddsResponse> {
        if !self.cache.is_fresh(sport, now, self.config.cache_ttl) {
            return None;
        }
        let result = self.cache.get(sport)?;
        increment_counter(CounterMetric::CacheHit);
        debug!(sport, "Cache hit");
        Some(self.respond(sport, Some(result), true, ResponseOrigin::Cache, now))
    }

    fn refresh_lock(&self, sport: &str) -> Arc<Mutex<()>> {
        self.refresh_locks
            .entry(sport.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn hydrate(&self, sport: &str) {
        let Some(store) = &self.store else {
            return;
        };

        match store.load(sport).await {
            Ok(Some(result)) if result.sport == sport => {
                info!(
                    sport,
                    events = result.events.len(),
                    fetched_at = %result.fetched_at,
                    "Hydrated cache from snapshot"
                );
                self.cache.put(sport, result);
            }
            Ok(Some(result)) => {
                warn!(sport, stored = %result.sport, "Snapshot sport mismatch, ignoring");
            }
            Ok(None) => {}
            Err(e) => warn!(sport, error = %e, "Failed to load snapshot"),
        }
    }

    async fn refresh(
        &self,
        sport: &str,
        now: DateTime<Utc>,
    ) -> Result<Arc<AnalysisResult>, UpstreamError> {
        if let Some(limit) = self.config.upstream_per_second {
            if !self.limiter.allow(&format!("upstream:{sport}"), limit, now) {
                return Err(UpstreamError::Throttled(sport.to_string()));
            }
        }

        debug!(sport, "Fetching odds from upstream");
        let started = Instant::now();
        let raw = self.feed.fetch(sport).await?;
        record_latency(LatencyMetric::UpstreamFetch, started.elapsed());

        let started = Instant::now();
        let events = self.analyzer.analyze(&raw);
        record_latency(LatencyMetric::Analysis, started.elapsed());

        let result = AnalysisResult::new(sport, events, now);
        set_gauge(GaugeMetric::CachedEvents, sport, result.events.len() as f64);
        set_gauge(GaugeMetric::ValueSignals, sport, result.value_signal_count() as f64);
        set_gauge(GaugeMetric::Arbitrages, sport, result.arbitrage_count() as f64);

        if let Some(store) = &self.store {
            if let Err(e) = store.store(&result).await {
                warn!(sport, error = %e, "Failed to persist snapshot");
            }
        }

        let result = self.cache.put(sport, result);
        info!(
            sport,
            events = result.events.len(),
            value_signals = result.value_signal_count(),
            arbitrages = result.arbitrage_count(),
            "Refreshed odds"
        );

        self.dispatch_alerts(&result);
        Ok(result)
    }

    fn dispatch_alerts(&self, result: &AnalysisResult) {
        let Some(sink) = &self.alerts else {
            return;
        };

        let alerts = qualifying_alerts(result, self.config.alert_min_margin);
        if alerts.is_empty() {
            return;
        }

        let sink = Arc::clone(sink);
        let mut tasks = self.alert_tasks.lock();
        while let Some(joined) = tasks.try_join_next() {
            if let Err(e) = joined {
                warn!(error = %e, "Alert task failed");
            }
        }
        tasks.spawn(async move {
            for alert in alerts {
                match sink.notify(&alert).await {
                    Ok(()) => increment_counter(CounterMetric::AlertSent),
                    Err(e) => warn!(
                        sport = %alert.sport,
                        event = %alert.event.id,
                        error = %e,
                        "Failed to deliver surebet alert"
                    ),
                }
            }
        });
    }

    /// Alert deliveries spawned and not yet reaped
    pub fn pending_alerts(&self) -> usize {
        self.alert_tasks.lock().len()
    }

    /// Wait for in-flight alert deliveries to finish
    pub async fn flush_alerts(&self) {
        let mut tasks = std::mem::take(&mut *self.alert_tasks.lock());
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Alert task failed");
            }
        }
    }

    fn respond(
        &self,
        sport: &str,
        result: Option<Arc<AnalysisResult>>,
        fresh: bool,
        origin: ResponseOrigin,
        now: DateTime<Utc>,
    ) -> OddsResponse {
        let advisory_ttl = match &result {
            Some(result) => self.policy.ttl_for(&result.events, now),
            None => self.policy.default_ttl,
        };

        OddsResponse {
            sport: sport.to_string(),
            fresh,
            origin,
            result,
            advisory_ttl,
            served_at: now,
        }
    }
}
