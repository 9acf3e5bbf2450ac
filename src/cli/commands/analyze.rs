//! Analyze command implementation.

use anyhow::{Context, Result};
use pulse_analysis::IndicatorEngine;
use pulse_config::AppConfig;
use pulse_data::CsvSeriesSource;
use tracing::info;

use super::build_service;
use crate::cli::{AnalyzeArgs, OutputFormat};

pub async fn run(args: AnalyzeArgs, config: &AppConfig, output: OutputFormat) -> Result<()> {
    let engine =
        IndicatorEngine::new(config.analysis.settings()).context("Invalid analysis settings")?;

    let report = if let Some(data_path) = &args.data {
        if !data_path.exists() {
            anyhow::bail!(
                "Data path '{}' does not exist. Provide a CSV file with date, price and volume columns (e.g. --data ./btc.csv)",
                data_path.display()
            );
        }
        let series = CsvSeriesSource::new(data_path)?
            .load(&args.asset)
            .with_context(|| format!("Failed to load {}", data_path.display()))?;
        info!(points = series.len(), "Loaded series from {:?}", data_path);
        engine.analyze(&series)
    } else {
        let service = build_service(config)?;
        let report = service
            .analyze(&args.asset, &engine)
            .await
            .with_context(|| format!("Failed to analyze {}", args.asset))?;

        let stats = service.gateway_stats();
        info!(
            calls = stats.calls,
            waited_ms = stats.total_wait.as_millis() as u64,
            "Gateway usage"
        );
        report
    };

    match output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => println!("{}", report.summary()),
    }

    if let Some(save_path) = &args.save {
        let json = report.to_json()?;
        std::fs::write(save_path, json)
            .with_context(|| format!("Failed to write {}", save_path.display()))?;
        info!("Report saved to {:?}", save_path);
    }

    Ok(())
}
