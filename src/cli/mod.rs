//! CLI definitions.

pub mod commands;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pulse_config::LoggingConfig;
use pulse_monitor::{LogFormat, LoggingOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pulse")]
#[command(author, version, about = "Crypto market data with technical signal analysis")]
pub struct Cli {
    /// Configuration file path (defaults and environment only when omitted)
    #[arg(short, long, env = "PULSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level, overrides the configured one
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// Logging options from the configuration, with command-line overrides.
    pub fn logging_options(&self, config: &LoggingConfig) -> Result<LoggingOptions> {
        let level = self
            .log_level
            .map(|l| l.as_str().to_string())
            .unwrap_or_else(|| config.level.clone());
        let format = if self.json_logs {
            LogFormat::Json
        } else {
            config.format.parse::<LogFormat>().map_err(|e| anyhow!(e))?
        };

        Ok(LoggingOptions {
            level,
            format,
            file: config.file.as_ref().map(PathBuf::from),
        })
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Current prices for every tracked asset
    Prices,
    /// Detailed market data for one asset
    Detail(AssetArgs),
    /// Price and volume history for one asset
    History(HistoryArgs),
    /// Technical analysis for one asset
    Analyze(AnalyzeArgs),
    /// Perpetual futures metrics for one asset
    Futures(AssetArgs),
    /// Search the provider's coin list
    Search(SearchArgs),
    /// List tracked assets
    Instruments,
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct AssetArgs {
    /// Asset id or symbol (e.g. bitcoin, BTC)
    pub asset: String,
}

#[derive(clap::Args)]
pub struct HistoryArgs {
    /// Asset id or symbol
    pub asset: String,

    /// Window length in days
    #[arg(short, long, default_value = "30")]
    pub days: u32,

    /// Number of most recent points to print in text output
    #[arg(long, default_value = "10")]
    pub tail: usize,
}

#[derive(clap::Args)]
pub struct AnalyzeArgs {
    /// Asset id or symbol; with --data, the label for the loaded series
    pub asset: String,

    /// Analyze a CSV file instead of fetching history
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Save the report as JSON
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct SearchArgs {
    /// Name or symbol fragment (at least 2 characters)
    pub query: String,
}
