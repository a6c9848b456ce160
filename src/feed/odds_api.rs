//! The Odds API client
//!
//! Fetches upcoming events with bookmaker prices for a sport and converts the
//! loosely-typed JSON payload into strict [`RawEvent`] records. Records that
//! lack an identity are dropped here, before any analysis sees them.

use super::{OddsFeed, RawBookmaker, RawEvent, RawMarket, RawOutcome, UpstreamError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;

/// The Odds API v4 base URL
pub const ODDS_API_URL: &str = "https://api.the-odds-api.com/v4";

/// Maximum characters of an error body kept in [`UpstreamError::Status`]
const ERROR_BODY_LIMIT: usize = 200;

/// Configuration for the odds API client
#[derive(Debug, Clone)]
pub struct OddsApiConfig {
    /// Base URL for the API
    pub base_url: String,
    /// API key sent as the `apiKey` query parameter
    pub api_key: String,
    /// Bookmaker regions (e.g. "eu", "uk,us")
    pub regions: String,
    /// Market set (e.g. "h2h")
    pub markets: String,
    /// Price format; analysis assumes "decimal"
    pub odds_format: String,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Total request timeout
    pub timeout: Duration,
}

impl Default for OddsApiConfig {
    fn default() -> Self {
        Self {
            base_url: ODDS_API_URL.to_string(),
            api_key: String::new(),
            regions: "eu".to_string(),
            markets: "h2h".to_string(),
            odds_format: "decimal".to_string(),
            connect_timeout: Duration::from_secs(4),
            timeout: Duration::from_secs(8),
        }
    }
}

/// HTTP client for the odds endpoint
pub struct OddsApiClient {
    config: OddsApiConfig,
    client: Client,
}

impl OddsApiClient {
    /// Create a new client, building an HTTP client with both timeouts set
    pub fn new(config: OddsApiConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { config, client })
    }

    /// Odds endpoint for a sport
    fn odds_url(&self, sport: &str) -> String {
        format!(
            "{}/sports/{}/odds",
            self.config.base_url.trim_end_matches('/'),
            sport
        )
    }
}

#[async_trait]
impl OddsFeed for OddsApiClient {
    async fn fetch(&self, sport: &str) -> Result<Vec<RawEvent>, UpstreamError> {
        let url = self.odds_url(sport);

        tracing::debug!(url = %url, sport, "Fetching odds from upstream");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.config.api_key.as_str()),
                ("regions", self.config.regions.as_str()),
                ("markets", self.config.markets.as_str()),
                ("oddsFormat", self.config.odds_format.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        let body = response.text().await?;
        let events = parse_events(&body)?;

        tracing::debug!(sport, events = events.len(), "Parsed upstream odds");

        Ok(events)
    }
}

/// Parse an odds endpoint payload into validated raw events
///
/// Fails only when the payload is not a JSON array. Each record is read
/// field by field: an event, bookmaker or outcome with a missing or
/// mistyped field is dropped on its own and the rest of the payload kept.
pub fn parse_events(body: &str) -> Result<Vec<RawEvent>, UpstreamError> {
    let events: Vec<Value> = serde_json::from_str(body)?;
    let total = events.len();

    let parsed: Vec<RawEvent> = events.iter().filter_map(convert_event).collect();

    if parsed.len() < total {
        tracing::debug!(
            dropped = total - parsed.len(),
            kept = parsed.len(),
            "Dropped incomplete upstream events"
        );
    }

    Ok(parsed)
}

fn convert_event(event: &Value) -> Option<RawEvent> {
    let id = text(event, "id")?;
    let home_team = text(event, "home_team")?;
    let away_team = text(event, "away_team")?;

    let commence_time = event
        .get("commence_time")
        .and_then(Value::as_str)
        .and_then(parse_start_time);

    let bookmakers = list(event, "bookmakers")
        .iter()
        .filter_map(convert_bookmaker)
        .collect();

    Some(RawEvent {
        id,
        home_team,
        away_team,
        commence_time,
        bookmakers,
    })
}

fn convert_bookmaker(bookmaker: &Value) -> Option<RawBookmaker> {
    // Title is the display name; fall back to the key
    let title = text(bookmaker, "title").or_else(|| text(bookmaker, "key"))?;

    let markets = list(bookmaker, "markets")
        .iter()
        .filter(|market| market.is_object())
        .map(|market| RawMarket {
            key: text(market, "key").unwrap_or_default(),
            outcomes: list(market, "outcomes")
                .iter()
                .filter_map(convert_outcome)
                .collect(),
        })
        .collect();

    Some(RawBookmaker { title, markets })
}

fn convert_outcome(outcome: &Value) -> Option<RawOutcome> {
    let name = text(outcome, "name")?;
    // Numbers only; quoted prices are treated as missing
    let price = parse_price(outcome.get("price")?.as_f64()?)?;
    Some(RawOutcome { name, price })
}

/// Non-blank string field
fn text(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Array field; absent, null or mistyped reads as empty
fn list<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Convert a JSON float to a decimal using its shortest round-trip form
fn parse_price(price: f64) -> Option<Decimal> {
    if !price.is_finite() {
        return None;
    }
    Decimal::from_str(&price.to_string()).ok()
}

fn parse_start_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
