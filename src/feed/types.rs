//! Raw odds feed types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single selection and its decimal price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOutcome {
    /// Selection name (e.g. "Home", "Draw", a team name)
    pub name: String,
    /// Decimal payout multiplier
    pub price: Decimal,
}

/// A bookmaker market (e.g. head-to-head)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMarket {
    /// Market key as reported upstream (e.g. "h2h")
    pub key: String,
    pub outcomes: Vec<RawOutcome>,
}

/// One bookmaker's markets for an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBookmaker {
    /// Display name
    pub title: String,
    pub markets: Vec<RawMarket>,
}

/// A scheduled event as delivered by the upstream feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Upstream event identifier
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    /// Scheduled start; `None` when upstream sent no parsable time
    pub commence_time: Option<DateTime<Utc>>,
    pub bookmakers: Vec<RawBookmaker>,
}

/// Upstream feed errors
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection or protocol failure
    #[error("Transport error: {0}")]
    Transport(String),
    /// Connect or total request timeout elapsed
    #[error("Upstream request timed out")]
    Timeout,
    /// Non-2xx response
    #[error("Upstream returned {status}: {body}")]
    Status { status: u16, body: String },
    /// Payload could not be decoded
    #[error("Malformed upstream payload: {0}")]
    Decode(String),
    /// Fetch refused by the local upstream rate limit
    #[error("Upstream fetch throttled for {0}")]
    Throttled(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key
        let err = err.without_url();
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(err: serde_json::Error) -> Self {
        UpstreamError::Decode(err.to_string())
    }
}
