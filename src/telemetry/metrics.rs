//! Prometheus metrics

use ::metrics::{counter, gauge, histogram};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Upstream odds fetch
    UpstreamFetch,
    /// Market analysis pass
    Analysis,
}

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Request served from a fresh cache entry
    CacheHit,
    /// Request needing an upstream refresh
    CacheMiss,
    /// Upstream fetch failed
    UpstreamFailure,
    /// Stale result served after a failed refresh
    StaleServed,
    /// No data available at all
    Unavailable,
    /// Rate limiter rejection
    RateLimited,
    /// Surebet alert delivered
    AlertSent,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Events in the last refreshed result
    CachedEvents,
    /// Value signals in the last refreshed result
    ValueSignals,
    /// Arbitrage opportunities in the last refreshed result
    Arbitrages,
}

impl LatencyMetric {
    fn name(self) -> &'static str {
        match self {
            LatencyMetric::UpstreamFetch => "odds_upstream_fetch_latency_ms",
            LatencyMetric::Analysis => "odds_analysis_latency_ms",
        }
    }
}

impl CounterMetric {
    fn name(self) -> &'static str {
        match self {
            CounterMetric::CacheHit => "odds_cache_hits_total",
            CounterMetric::CacheMiss => "odds_cache_misses_total",
            CounterMetric::UpstreamFailure => "odds_upstream_failures_total",
            CounterMetric::StaleServed => "odds_stale_responses_total",
            CounterMetric::Unavailable => "odds_unavailable_responses_total",
            CounterMetric::RateLimited => "odds_rate_limited_total",
            CounterMetric::AlertSent => "odds_alerts_sent_total",
        }
    }
}

impl GaugeMetric {
    fn name(self) -> &'static str {
        match self {
            GaugeMetric::CachedEvents => "odds_cached_events",
            GaugeMetric::ValueSignals => "odds_value_signals",
            GaugeMetric::Arbitrages => "odds_arbitrages",
        }
    }
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    histogram!(metric.name()).record(duration.as_secs_f64() * 1000.0);
}

/// Increment a counter by one
pub fn increment_counter(metric: CounterMetric) {
    counter!(metric.name()).increment(1);
}

/// Set a per-sport gauge value
pub fn set_gauge(metric: GaugeMetric, sport: &str, value: f64) {
    gauge!(metric.name(), "sport" => sport.to_string()).set(value);
}

/// Install the Prometheus recorder with an HTTP scrape endpoint
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus metrics endpoint listening");
    Ok(())
}
