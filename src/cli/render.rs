//! Terminal output for analysis results

use crate::analysis::EnrichedEvent;
use clap::ValueEnum;

/// Output format for result-printing commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Render events as a plain-text report
pub fn events_table(events: &[EnrichedEvent]) -> String {
    if events.is_empty() {
        return "  No events\n".to_string();
    }

    let mut out = String::new();
    for event in events {
        let start = event
            .commence_time
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "start unknown".to_string());
        out.push_str(&format!("  {} ({})\n", event.matchup(), start));

        for signal in &event.values {
            out.push_str(&format!(
                "    value  {:<20} {:>7} @ {} (avg {})\n",
                signal.outcome, signal.price, signal.bookmaker, signal.average
            ));
        }

        if let Some(arb) = &event.arbitrage {
            let legs: Vec<String> = arb
                .best_prices
                .iter()
                .map(|(outcome, price)| format!("{outcome} {price}"))
                .collect();
            out.push_str(&format!(
                "    surebet {}% margin: {}\n",
                arb.margin,
                legs.join(", ")
            ));
        }
    }
    out
}
