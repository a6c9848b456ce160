//! Status command implementation

use crate::config::Config;
use crate::data::{JsonSnapshotStore, SnapshotSummary};
use chrono::{DateTime, Utc};
use clap::Args;

#[derive(Args, Debug)]
pub struct StatusArgs {}

impl StatusArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        println!("odds-engine status");
        println!("  Sports: {}", config.sports.enabled.join(", "));

        let Some(dir) = &config.cache.snapshot_dir else {
            println!("  Snapshots: disabled");
            return Ok(());
        };

        let summaries = JsonSnapshotStore::new(dir).summaries().await?;
        println!("  Snapshots: {} in {}", summaries.len(), dir.display());
        let now = Utc::now();
        for summary in &summaries {
            println!("{}", summary_line(summary, now));
        }
        Ok(())
    }
}

fn summary_line(summary: &SnapshotSummary, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(summary.fetched_at).num_seconds().max(0);
    format!(
        "    {:<24} {:>4} events {:>3} value {:>3} surebets  age {}s",
        summary.sport, summary.events, summary.value_signals, summary.arbitrages, age
    )
}
