//! Market analysis module
//!
//! Detects value outcomes (priced above their market average) and
//! cross-bookmaker arbitrage from raw feed events.

mod analyzer;
mod types;

pub use analyzer::{analyze, detect_arbitrage, implied_probability, AnalyzerConfig, MarketAnalyzer};
pub use types::{AnalysisResult, ArbitrageOpportunity, EnrichedEvent, ValueSignal};
