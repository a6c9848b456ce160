use clap::Parser;
use odds_engine::cli::{Cli, Commands};
use odds_engine::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(odds_engine::config::ConfigError::Io(e)) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            Config::default()
        }
        Err(e) => return Err(e.into()),
    };

    // Initialize telemetry
    odds_engine::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Odds(args) => args.execute(&config).await?,
        Commands::Analyze(args) => args.execute(&config).await?,
        Commands::Status(args) => args.execute(&config).await?,
        Commands::Config => {
            println!("Current configuration ({}):", cli.config);
            print!("{}", toml::to_string_pretty(&config.redacted())?);
        }
    }

    Ok(())
}
