//! Futures metrics command.

use anyhow::{Context, Result};
use chrono::DateTime;
use pulse_config::AppConfig;

use super::{build_service, format_large, print_json, RULE};
use crate::cli::{AssetArgs, OutputFormat};

pub async fn run(args: AssetArgs, config: &AppConfig, output: OutputFormat) -> Result<()> {
    let service = build_service(config)?;
    let metrics = service
        .futures_metrics(&args.asset)
        .await
        .with_context(|| format!("Failed to fetch futures metrics for {}", args.asset))?;

    if output == OutputFormat::Json {
        return print_json(&metrics);
    }

    println!("FUTURES: {}USDT", metrics.symbol);
    println!("{}", RULE);
    if !metrics.available {
        println!("No futures data available.");
        println!("{}", RULE);
        return Ok(());
    }

    match &metrics.funding_rate {
        Some(funding) => {
            let time = DateTime::from_timestamp_millis(funding.time)
                .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_default();
            println!("Funding Rate:        {:.4}% ({})", funding.rate, time);
        }
        None => println!("Funding Rate:        n/a"),
    }
    match &metrics.open_interest {
        Some(oi) => println!("Open Interest:       {}", format_large(oi.value)),
        None => println!("Open Interest:       n/a"),
    }
    match &metrics.long_short_ratio {
        Some(ratio) => println!(
            "Long/Short Ratio:    {:.2} (long {:.1}%, short {:.1}%)",
            ratio.ratio,
            ratio.long_account * 100.0,
            ratio.short_account * 100.0
        ),
        None => println!("Long/Short Ratio:    n/a"),
    }
    println!("{}", RULE);

    Ok(())
}
