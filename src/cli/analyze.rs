//! Analyze command implementation

use super::render::{events_table, OutputFormat};
use crate::analysis::MarketAnalyzer;
use crate::config::Config;
use crate::feed::parse_events;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Saved upstream odds payload (JSON)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl AnalyzeArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let body = tokio::fs::read_to_string(&self.input).await?;
        let raw = parse_events(&body)?;

        let analyzer = MarketAnalyzer::new(config.analyzer_config());
        let events = analyzer.analyze(&raw);
        tracing::info!(
            input = ?self.input,
            events = events.len(),
            "Analyzed saved payload"
        );

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&events)?),
            OutputFormat::Table => print!("{}", events_table(&events)),
        }
        Ok(())
    }
}
