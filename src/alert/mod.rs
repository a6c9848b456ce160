//! Surebet alerting module
//!
//! Pushes freshly detected arbitrage opportunities above a margin threshold
//! to an external sink. Delivery is best-effort.

mod webhook;

pub use webhook::WebhookAlerter;

use crate::analysis::{AnalysisResult, EnrichedEvent};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;

/// Alert payload: the sport plus the enriched event's fields
#[derive(Debug, Clone, Serialize)]
pub struct SurebetAlert {
    pub sport: String,
    #[serde(flatten)]
    pub event: EnrichedEvent,
}

/// Trait for alert delivery implementations
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Deliver a single alert
    async fn notify(&self, alert: &SurebetAlert) -> anyhow::Result<()>;
}

/// Alerts for every event whose arbitrage margin is at least `min_margin`
pub fn qualifying_alerts(result: &AnalysisResult, min_margin: Decimal) -> Vec<SurebetAlert> {
    result
        .events
        .iter()
        .filter(|event| {
            event
                .arbitrage
                .as_ref()
                .is_some_and(|arb| arb.margin >= min_margin)
        })
        .map(|event| SurebetAlert {
            sport: result.sport.clone(),
            event: event.clone(),
        })
        .collect()
}
