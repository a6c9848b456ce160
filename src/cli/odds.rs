//! Odds command implementation

use super::render::{events_table, OutputFormat};
use crate::alert::WebhookAlerter;
use crate::analysis::MarketAnalyzer;
use crate::config::Config;
use crate::data::JsonSnapshotStore;
use crate::feed::OddsApiClient;
use crate::service::{AggregationService, OddsResponse};
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct OddsArgs {
    /// Sport key; defaults to the first enabled sport
    #[arg(short, long)]
    pub sport: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl OddsArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let service = build_service(config)?;
        let sport = service.resolve_sport(self.sport.as_deref());

        tracing::info!(sport = %sport, "Requesting odds");
        let response = service.request(&sport).await;
        service.flush_alerts().await;

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&response_json(&response))?);
            }
            OutputFormat::Table => print!("{}", response_table(&response)),
        }

        if response.is_unavailable() {
            anyhow::bail!("No odds available for {}", response.sport);
        }
        Ok(())
    }
}

/// Wire an [`AggregationService`] from configuration
pub fn build_service(config: &Config) -> anyhow::Result<AggregationService> {
    let client = OddsApiClient::new(config.odds_api_config()?)?;

    let mut service = AggregationService::new(
        Arc::new(client),
        MarketAnalyzer::new(config.analyzer_config()),
        config.freshness_policy(),
        config.service_config(),
    );

    if let Some(dir) = &config.cache.snapshot_dir {
        service = service.with_store(Arc::new(JsonSnapshotStore::new(dir)));
    }

    if let Some(url) = &config.alert.webhook_url {
        let alerter = WebhookAlerter::new(url, Duration::from_secs(config.alert.timeout_secs))?;
        service = service.with_alerts(Arc::new(alerter));
    }

    Ok(service)
}

fn response_json(response: &OddsResponse) -> serde_json::Value {
    serde_json::json!({
        "updated_at": response.served_at,
        "fetched_at": response.fetched_at(),
        "sport": response.sport,
        "events": response.events(),
        "stale": !response.fresh,
        "ttl_hint_secs": response.advisory_ttl.num_seconds(),
    })
}

fn response_table(response: &OddsResponse) -> String {
    let freshness = if response.fresh { "fresh" } else { "STALE" };
    let updated = response
        .fetched_at()
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "never".to_string());

    let mut out = format!(
        "{} [{}] updated {} ttl {}s\n",
        response.sport,
        freshness,
        updated,
        response.advisory_ttl.num_seconds()
    );
    out.push_str(&events_table(response.events()));
    out
}
