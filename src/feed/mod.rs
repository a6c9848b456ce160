//! Odds feed module
//!
//! Fetches raw event, bookmaker and market data for one sport from the
//! upstream odds provider. No business logic lives here.

mod odds_api;
mod types;

pub use odds_api::{parse_events, OddsApiClient, OddsApiConfig, ODDS_API_URL};
pub use types::{RawBookmaker, RawEvent, RawMarket, RawOutcome, UpstreamError};

use async_trait::async_trait;

/// Trait for upstream odds feed implementations
#[async_trait]
pub trait OddsFeed: Send + Sync {
    /// Fetch all upcoming events with bookmaker odds for a sport
    async fn fetch(&self, sport: &str) -> Result<Vec<RawEvent>, UpstreamError>;
}
