//! CLI interface for odds-engine
//!
//! Provides subcommands for:
//! - `odds`: Fetch and analyze odds for a sport
//! - `analyze`: Analyze a saved upstream payload offline
//! - `status`: Show stored snapshots
//! - `config`: Show the effective configuration

mod analyze;
mod odds;
mod render;
mod status;

pub use analyze::AnalyzeArgs;
pub use odds::{build_service, OddsArgs};
pub use render::OutputFormat;
pub use status::StatusArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "odds-engine")]
#[command(about = "Odds aggregation with value-bet and surebet detection")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch and analyze odds for a sport
    Odds(OddsArgs),
    /// Analyze a saved upstream payload
    Analyze(AnalyzeArgs),
    /// Show stored snapshots
    Status(StatusArgs),
    /// Show the effective configuration
    Config,
}
