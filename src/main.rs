//! market-pulse CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::commands;
use cli::{Cli, Commands};
use pulse_config::{load_config, AppConfig, ConfigError, LoggingConfig};
use pulse_monitor::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = load_config(cli.config.as_deref());

    // Setup logging; an unreadable config still gets default logging so the error is reported
    let logging = loaded
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_else(|_| LoggingConfig::default());
    let _guard = setup_logging(&cli.logging_options(&logging)?)
        .context("Failed to initialize logging")?;

    let output = cli.output;

    // Execute command
    match cli.command {
        Commands::Prices => commands::prices::run(&required(loaded)?, output).await,
        Commands::Detail(args) => commands::detail::run(args, &required(loaded)?, output).await,
        Commands::History(args) => commands::history::run(args, &required(loaded)?, output).await,
        Commands::Analyze(args) => commands::analyze::run(args, &required(loaded)?, output).await,
        Commands::Futures(args) => commands::futures::run(args, &required(loaded)?, output).await,
        Commands::Search(args) => commands::search::run(args, &required(loaded)?, output).await,
        Commands::Instruments => commands::instruments::run(&required(loaded)?, output),
        Commands::ValidateConfig => {
            commands::validate::run(cli.config.as_deref(), loaded, output)
        }
    }
}

fn required(loaded: Result<AppConfig, ConfigError>) -> Result<AppConfig> {
    loaded.context("Failed to load configuration")
}
