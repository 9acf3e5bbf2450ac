//! Validate configuration command.

use anyhow::Result;
use pulse_config::{AppConfig, ConfigError};
use std::path::Path;

use super::print_json;
use crate::cli::OutputFormat;

pub fn run(
    config_path: Option<&Path>,
    loaded: Result<AppConfig, ConfigError>,
    output: OutputFormat,
) -> Result<()> {
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    if output == OutputFormat::Json {
        return print_json(&config);
    }

    match config_path {
        Some(path) => println!("Validating configuration: {:?}", path),
        None => println!("Validating configuration: defaults and environment"),
    }
    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Tracked assets: {}", config.instruments.len());
    println!("Gateway spacing: {}ms", config.gateway.min_delay_ms);
    println!("Analysis window: {} days", config.analysis.window_days);
    println!();
    println!("Effective configuration:");
    println!();
    println!("{}", config.to_toml()?);

    Ok(())
}
