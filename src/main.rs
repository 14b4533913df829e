//! Risk-gated trading engine CLI.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use trading_config::{load_config, AppConfig, ConfigLoadError};
use trading_monitor::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = load_config(&cli.config);

    // Command line flags win over the config file
    let (level, json) = match &loaded {
        Ok(config) => (
            cli.log_level
                .map(|l| l.as_str().to_string())
                .unwrap_or_else(|| config.logging.level.clone()),
            cli.json_logs || config.logging.is_json(),
        ),
        Err(_) => (
            cli.log_level.map_or("info", |l| l.as_str()).to_string(),
            cli.json_logs,
        ),
    };
    setup_logging(&level, json);

    let config_path = cli.config;
    let required = |loaded: Result<AppConfig, ConfigLoadError>| -> Result<AppConfig> {
        loaded.with_context(|| format!("Failed to load config {}", config_path.display()))
    };

    match cli.command {
        Commands::ValidateConfig => cli::commands::validate::run(&config_path, loaded),
        Commands::Submit(args) => cli::commands::submit::run(args, &required(loaded)?).await,
        Commands::CheckPosition(args) => {
            cli::commands::check_position::run(args, &required(loaded)?).await
        }
        Commands::Metrics(args) => cli::commands::metrics::run(args, &required(loaded)?).await,
    }
}
