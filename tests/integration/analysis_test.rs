//! Integration tests for market analysis

use crate::support::{d, derby, surebet};
use odds_engine::analysis::{analyze, AnalysisResult, AnalyzerConfig, MarketAnalyzer};
use odds_engine::cache::FreshnessPolicy;
use odds_engine::feed::parse_events;
use chrono::{Duration, TimeZone, Utc};
use rust_decimal_macros::dec;

#[test]
fn test_derby_value_signals_per_book() {
    let enriched = MarketAnalyzer::default().analyze(&[derby()]);
    let event = &enriched[0];

    // Draw and Chelsea clear each book's own cutoff; Arsenal never does
    assert_eq!(event.values.len(), 6);
    assert!(event.values.iter().all(|v| v.outcome != "Arsenal"));

    let book_a: Vec<&str> = event
        .values
        .iter()
        .filter(|v| v.bookmaker == "BookA")
        .map(|v| v.outcome.as_str())
        .collect();
    assert_eq!(book_a, vec!["Draw", "Chelsea"]);

    // Best of 2.25 / 3.50 / 3.60 sums above 1.0
    assert!(event.arbitrage.is_none());
}

#[test]
fn test_surebet_margin_and_best_prices() {
    let enriched = analyze(&[surebet()], dec!(0.07), dec!(0.02));
    let arb = enriched[0].arbitrage.as_ref().unwrap();

    // 1/2.20 + 1/2.20 = 0.90909
    assert_eq!(arb.margin, dec!(9.09));
    assert_eq!(arb.best_prices.get("A"), Some(&d("2.20")));
    assert_eq!(arb.best_prices.get("B"), Some(&d("2.20")));
}

#[test]
fn test_wider_gap_suppresses_surebet() {
    let analyzer = MarketAnalyzer::new(AnalyzerConfig {
        value_threshold: dec!(0.07),
        arb_gap: dec!(0.10),
    });
    assert!(analyzer.analyze(&[surebet()])[0].arbitrage.is_none());
}

#[test]
fn test_saved_payload_through_analysis_and_ttl() {
    let body = r#"[
        {
            "id": "evt-1",
            "sport_key": "soccer_epl",
            "commence_time": "2024-09-01T13:00:00Z",
            "home_team": "Arsenal",
            "away_team": "Chelsea",
            "bookmakers": [
                {"key": "a", "title": "BookA", "markets": [{"key": "h2h", "outcomes": [
                    {"name": "Arsenal", "price": 2.2}, {"name": "Chelsea", "price": 1.8}
                ]}]},
                {"key": "b", "title": "BookB", "markets": [{"key": "h2h", "outcomes": [
                    {"name": "Arsenal", "price": 1.8}, {"name": "Chelsea", "price": 2.2}
                ]}]}
            ]
        },
        {"id": "", "home_team": "Nobody", "away_team": "Nowhere", "bookmakers": []}
    ]"#;

    let raw = parse_events(body).unwrap();
    assert_eq!(raw.len(), 1);

    let now = Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap();
    let result = AnalysisResult::new("soccer_epl", MarketAnalyzer::default().analyze(&raw), now);
    assert_eq!(result.arbitrage_count(), 1);
    assert_eq!(result.value_signal_count(), 2);

    // Kick-off in 60 minutes falls inside the 90-minute window
    let policy = FreshnessPolicy::default();
    assert_eq!(policy.ttl_for(&result.events, now), Duration::seconds(120));
    assert_eq!(
        policy.ttl_for(&result.events, now - Duration::hours(3)),
        Duration::seconds(600)
    );
}
