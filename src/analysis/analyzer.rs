//! Value-bet and surebet detection

use super::{ArbitrageOpportunity, EnrichedEvent, ValueSignal};
use crate::feed::{RawEvent, RawMarket, RawOutcome};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

/// Configuration for market analysis
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Fraction above the market average an outcome must exceed (0.07 = 7%)
    pub value_threshold: Decimal,
    /// Required gap below an implied sum of 1.0 to report arbitrage
    pub arb_gap: Decimal,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            value_threshold: dec!(0.07),
            arb_gap: dec!(0.02),
        }
    }
}

/// Turns raw events into enriched events
///
/// Pure and deterministic: identical input always yields identical output.
#[derive(Debug, Clone, Default)]
pub struct MarketAnalyzer {
    config: AnalyzerConfig,
}

impl MarketAnalyzer {
    /// Create a new analyzer
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze every event in order
    pub fn analyze(&self, events: &[RawEvent]) -> Vec<EnrichedEvent> {
        events.iter().map(|event| self.analyze_event(event)).collect()
    }

    /// Analyze a single event
    ///
    /// Value signals are evaluated per market against that market's average.
    /// Best prices are collected across every market of every bookmaker,
    /// keyed by exact outcome name.
    pub fn analyze_event(&self, event: &RawEvent) -> EnrichedEvent {
        let mut values = Vec::new();
        let mut best_prices: BTreeMap<String, Decimal> = BTreeMap::new();

        for bookmaker in &event.bookmakers {
            for market in &bookmaker.markets {
                let priced = priced_outcomes(market);
                let Some(average) = mean_price(&priced) else {
                    continue;
                };

                if let Some(cutoff) = average.checked_mul(Decimal::ONE + self.config.value_threshold) {
                    values.extend(priced.iter().filter(|o| o.price > cutoff).map(|o| {
                        ValueSignal {
                            outcome: o.name.clone(),
                            price: o.price,
                            bookmaker: bookmaker.title.clone(),
                            average: average.round_dp(2),
                        }
                    }));
                }

                for outcome in priced {
                    best_prices
                        .entry(outcome.name.clone())
                        .and_modify(|best| {
                            if outcome.price > *best {
                                *best = outcome.price;
                            }
                        })
                        .or_insert(outcome.price);
                }
            }
        }

        EnrichedEvent {
            id: event.id.clone(),
            home_team: event.home_team.clone(),
            away_team: event.away_team.clone(),
            commence_time: event.commence_time,
            values,
            arbitrage: detect_arbitrage(best_prices, self.config.arb_gap),
        }
    }
}

/// Analyze events with explicit thresholds
pub fn analyze(events: &[RawEvent], value_threshold: Decimal, arb_gap: Decimal) -> Vec<EnrichedEvent> {
    MarketAnalyzer::new(AnalyzerConfig {
        value_threshold,
        arb_gap,
    })
    .analyze(events)
}

/// Implied probability of a decimal price, `None` for non-positive prices
pub fn implied_probability(price: Decimal) -> Option<Decimal> {
    if price <= Decimal::ZERO {
        return None;
    }
    Decimal::ONE.checked_div(price)
}

/// Report arbitrage when the implied sum of the best prices is below `1 - arb_gap`
pub fn detect_arbitrage(
    best_prices: BTreeMap<String, Decimal>,
    arb_gap: Decimal,
) -> Option<ArbitrageOpportunity> {
    if best_prices.is_empty() {
        return None;
    }

    let mut implied_sum = Decimal::ZERO;
    for price in best_prices.values() {
        // Overflow only happens for absurdly small prices, never an arb
        implied_sum = implied_sum.checked_add(implied_probability(*price)?)?;
    }

    if implied_sum < Decimal::ONE - arb_gap {
        let margin = ((Decimal::ONE - implied_sum) * dec!(100)).round_dp(2);
        Some(ArbitrageOpportunity {
            margin,
            best_prices,
        })
    } else {
        None
    }
}

/// Outcomes with a usable (strictly positive) price
fn priced_outcomes(market: &RawMarket) -> Vec<&RawOutcome> {
    market
        .outcomes
        .iter()
        .filter(|outcome| outcome.price > Decimal::ZERO)
        .collect()
}

fn mean_price(outcomes: &[&RawOutcome]) -> Option<Decimal> {
    if outcomes.is_empty() {
        return None;
    }
    let mut sum = Decimal::ZERO;
    for outcome in outcomes {
        sum = sum.checked_add(outcome.price)?;
    }
    sum.checked_div(Decimal::from(outcomes.len()))
}
