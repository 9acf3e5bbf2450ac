//! Historical series command.

use anyhow::{Context, Result};
use pulse_config::AppConfig;

use super::{build_service, format_large, format_price, print_json, RULE, THIN_RULE};
use crate::cli::{HistoryArgs, OutputFormat};

pub async fn run(args: HistoryArgs, config: &AppConfig, output: OutputFormat) -> Result<()> {
    let service = build_service(config)?;
    let series = service
        .historical_series(&args.asset, args.days)
        .await
        .with_context(|| format!("Failed to fetch history for {}", args.asset))?;

    if output == OutputFormat::Json {
        return print_json(&series);
    }

    let prices = series.price_values();
    let low = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let high = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    println!("HISTORY: {}", series.instrument_id.to_uppercase());
    println!("{}", RULE);
    println!("Window:              {} days", series.window_days);
    println!("Granularity:         {}", series.granularity());
    println!("Points:              {}", series.len());
    if !prices.is_empty() {
        println!("Low / High:          {} / {}", format_price(low), format_price(high));
    }
    println!();
    println!("LATEST");
    println!("{}", THIN_RULE);

    let volumes = series.volumes();
    let skip = series.len().saturating_sub(args.tail);
    for point in series.prices().iter().skip(skip) {
        let volume = volumes
            .iter()
            .find(|v| v.timestamp == point.timestamp)
            .map(|v| format_large(v.volume))
            .unwrap_or_default();
        println!(
            "  {}  {:>14}  {:>10}",
            point.datetime().format("%Y-%m-%d %H:%M"),
            format_price(point.price),
            volume
        );
    }
    println!("{}", RULE);

    Ok(())
}
