//! Configuration types for odds-engine

use crate::analysis::AnalyzerConfig;
use crate::cache::FreshnessPolicy;
use crate::feed::{OddsApiConfig, ODDS_API_URL};
use crate::service::ServiceConfig;
use crate::telemetry::LogFormat;
use chrono::Duration as ChronoDuration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable consulted when `[feed].api_key` is absent
pub const API_KEY_ENV: &str = "ODDS_API_KEY";

/// Upper bound for TTLs and the soon window (one week)
const MAX_WINDOW_SECS: u64 = 7 * 24 * 60 * 60;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("No API key: set [feed].api_key or ODDS_API_KEY")]
    MissingApiKey,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub sports: SportsConfig,
    pub analysis: AnalysisConfig,
    pub freshness: FreshnessConfig,
    pub cache: CacheConfig,
    pub rate_limit: RateLimitConfig,
    pub alert: AlertConfig,
    pub telemetry: TelemetryConfig,
}

/// Upstream odds provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_regions")]
    pub regions: String,

    #[serde(default = "default_markets")]
    pub markets: String,

    #[serde(default = "default_odds_format")]
    pub odds_format: String,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    ODDS_API_URL.to_string()
}
fn default_regions() -> String {
    "eu".to_string()
}
fn default_markets() -> String {
    "h2h".to_string()
}
fn default_odds_format() -> String {
    "decimal".to_string()
}
fn default_connect_timeout_secs() -> u64 {
    4
}
fn default_timeout_secs() -> u64 {
    8
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            regions: default_regions(),
            markets: default_markets(),
            odds_format: default_odds_format(),
            connect_timeout_secs: default_connect_timeout_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Sport allow-list; the first entry is the default sport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SportsConfig {
    #[serde(default = "default_enabled_sports")]
    pub enabled: Vec<String>,
}

fn default_enabled_sports() -> Vec<String> {
    vec!["soccer_epl".to_string()]
}

impl Default for SportsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_sports(),
        }
    }
}

/// Market analysis thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Fraction above the market average for a value signal
    #[serde(default = "default_value_threshold")]
    pub value_threshold: Decimal,

    /// Gap below an implied sum of 1.0 for an arbitrage
    #[serde(default = "default_arb_gap")]
    pub arb_gap: Decimal,
}

fn default_value_threshold() -> Decimal {
    Decimal::new(7, 2) // 0.07
}
fn default_arb_gap() -> Decimal {
    Decimal::new(2, 2) // 0.02
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            value_threshold: default_value_threshold(),
            arb_gap: default_arb_gap(),
        }
    }
}

/// Cache staleness and advisory TTL configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreshnessConfig {
    /// Age after which a cached result is refreshed
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Advisory TTL when an event starts soon
    #[serde(default = "default_ttl_min_secs")]
    pub ttl_min_secs: u64,

    /// Advisory TTL otherwise
    #[serde(default = "default_ttl_max_secs")]
    pub ttl_max_secs: u64,

    #[serde(default = "default_soon_window_minutes")]
    pub soon_window_minutes: u64,
}

fn default_cache_ttl_secs() -> u64 {
    300
}
fn default_ttl_min_secs() -> u64 {
    120
}
fn default_ttl_max_secs() -> u64 {
    600
}
fn default_soon_window_minutes() -> u64 {
    90
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
            ttl_min_secs: default_ttl_min_secs(),
            ttl_max_secs: default_ttl_max_secs(),
            soon_window_minutes: default_soon_window_minutes(),
        }
    }
}

/// Snapshot persistence configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory for per-sport snapshots; persistence is off when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_dir: Option<PathBuf>,
}

/// Upstream throttling configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum upstream fetches per sport per second
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_per_second: Option<u32>,
}

/// Surebet alert configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,

    /// Minimum arbitrage margin in percent
    #[serde(default = "default_min_margin")]
    pub min_margin: Decimal,

    #[serde(default = "default_alert_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_min_margin() -> Decimal {
    Decimal::new(30, 1) // 3.0%
}
fn default_alert_timeout_secs() -> u64 {
    2
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            min_margin: default_min_margin(),
            timeout_secs: default_alert_timeout_secs(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sports.enabled.iter().all(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "sports.enabled must list at least one sport".to_string(),
            ));
        }

        let f = &self.freshness;
        if f.cache_ttl_secs == 0 || f.ttl_min_secs == 0 || f.ttl_max_secs == 0 {
            return Err(ConfigError::Invalid("TTLs must be positive".to_string()));
        }
        if f.cache_ttl_secs > MAX_WINDOW_SECS
            || f.ttl_max_secs > MAX_WINDOW_SECS
            || f.soon_window_minutes > MAX_WINDOW_SECS / 60
        {
            return Err(ConfigError::Invalid(format!(
                "freshness windows must not exceed {MAX_WINDOW_SECS} seconds"
            )));
        }
        if f.ttl_min_secs > f.ttl_max_secs {
            return Err(ConfigError::Invalid(format!(
                "freshness.ttl_min_secs ({}) exceeds ttl_max_secs ({})",
                f.ttl_min_secs, f.ttl_max_secs
            )));
        }

        let a = &self.analysis;
        if a.value_threshold.is_sign_negative() || a.arb_gap.is_sign_negative() {
            return Err(ConfigError::Invalid(
                "analysis thresholds must not be negative".to_string(),
            ));
        }
        if a.arb_gap >= Decimal::ONE {
            return Err(ConfigError::Invalid(
                "analysis.arb_gap must be below 1".to_string(),
            ));
        }
        if self.alert.min_margin.is_sign_negative() {
            return Err(ConfigError::Invalid(
                "alert.min_margin must not be negative".to_string(),
            ));
        }

        Ok(())
    }

    /// API key from the file, falling back to the environment
    pub fn api_key(&self) -> Option<String> {
        self.feed
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }

    /// Client settings for the upstream provider
    pub fn odds_api_config(&self) -> Result<OddsApiConfig, ConfigError> {
        let api_key = self.api_key().ok_or(ConfigError::MissingApiKey)?;
        Ok(OddsApiConfig {
            base_url: self.feed.base_url.clone(),
            api_key,
            regions: self.feed.regions.clone(),
            markets: self.feed.markets.clone(),
            odds_format: self.feed.odds_format.clone(),
            connect_timeout: Duration::from_secs(self.feed.connect_timeout_secs),
            timeout: Duration::from_secs(self.feed.timeout_secs),
        })
    }

    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            value_threshold: self.analysis.value_threshold,
            arb_gap: self.analysis.arb_gap,
        }
    }

    /// Advisory TTL policy; an empty result gets the cache TTL
    pub fn freshness_policy(&self) -> FreshnessPolicy {
        let f = &self.freshness;
        FreshnessPolicy {
            soon_window: ChronoDuration::minutes(f.soon_window_minutes as i64),
            ttl_min: ChronoDuration::seconds(f.ttl_min_secs as i64),
            ttl_max: ChronoDuration::seconds(f.ttl_max_secs as i64),
            default_ttl: ChronoDuration::seconds(f.cache_ttl_secs as i64),
        }
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            sports: self
                .sports
                .enabled
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            cache_ttl: ChronoDuration::seconds(self.freshness.cache_ttl_secs as i64),
            upstream_per_second: self.rate_limit.upstream_per_second,
            alert_min_margin: self.alert.min_margin,
        }
    }

    /// Copy safe to print: secrets replaced
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.feed.api_key.is_some() {
            config.feed.api_key = Some("***".to_string());
        }
        config
    }
}
