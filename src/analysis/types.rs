//! Analysis output types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An outcome priced above its market average by more than the threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSignal {
    /// Selection name
    pub outcome: String,
    /// Offered decimal price
    pub price: Decimal,
    /// Bookmaker offering the price
    pub bookmaker: String,
    /// Market average at detection time, rounded to 2 places
    pub average: Decimal,
}

/// Best prices across bookmakers whose implied probabilities sum below one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    /// Guaranteed profit margin in percent, rounded to 2 places
    pub margin: Decimal,
    /// Best (maximum) price seen for each outcome name
    pub best_prices: BTreeMap<String, Decimal>,
}

/// An event with its detected market signals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedEvent {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub commence_time: Option<DateTime<Utc>>,
    pub values: Vec<ValueSignal>,
    pub arbitrage: Option<ArbitrageOpportunity>,
}

impl EnrichedEvent {
    /// "Home vs Away" label
    pub fn matchup(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }
}

/// One analysis pass over a sport, replaced wholesale on every refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Sport key (e.g. "soccer_epl")
    pub sport: String,
    pub events: Vec<EnrichedEvent>,
    /// When the upstream data was fetched
    pub fetched_at: DateTime<Utc>,
}

impl AnalysisResult {
    pub fn new(sport: impl Into<String>, events: Vec<EnrichedEvent>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            sport: sport.into(),
            events,
            fetched_at,
        }
    }

    /// Total value signals across all events
    pub fn value_signal_count(&self) -> usize {
        self.events.iter().map(|e| e.values.len()).sum()
    }

    /// Number of events with an arbitrage opportunity
    pub fn arbitrage_count(&self) -> usize {
        self.events.iter().filter(|e| e.arbitrage.is_some()).count()
    }
}
