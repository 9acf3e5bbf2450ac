//! Price snapshot command.

use anyhow::{Context, Result};
use pulse_config::AppConfig;

use super::{build_service, format_large, format_price, print_json, RULE, THIN_RULE};
use crate::cli::OutputFormat;

pub async fn run(config: &AppConfig, output: OutputFormat) -> Result<()> {
    let service = build_service(config)?;
    let rows = service
        .price_snapshot()
        .await
        .context("Failed to fetch prices")?;

    if output == OutputFormat::Json {
        return print_json(&rows);
    }

    let quote = config.provider.quote_currency.to_uppercase();
    println!("PRICES ({})", quote);
    println!("{}", RULE);
    println!(
        "  {:<6} {:<18} {:>14} {:>9} {:>12} {:>12}",
        "SYMBOL", "NAME", "PRICE", "24H", "VOLUME", "MCAP"
    );
    println!("  {}", THIN_RULE);
    for row in &rows {
        println!(
            "  {:<6} {:<18} {:>14} {:>8.2}% {:>12} {:>12}",
            row.symbol,
            row.name,
            format_price(row.price),
            row.change_24h,
            format_large(row.volume_24h),
            format_large(row.market_cap),
        );
    }
    println!("{}", RULE);

    Ok(())
}
