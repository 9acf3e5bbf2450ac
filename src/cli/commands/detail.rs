//! Asset detail command.

use anyhow::{Context, Result};
use pulse_config::AppConfig;

use super::{build_service, format_large, format_price, print_json, RULE, THIN_RULE};
use crate::cli::{AssetArgs, OutputFormat};

fn optional(value: Option<f64>) -> String {
    value.map(format_large).unwrap_or_else(|| "n/a".to_string())
}

pub async fn run(args: AssetArgs, config: &AppConfig, output: OutputFormat) -> Result<()> {
    let service = build_service(config)?;
    let detail = service
        .asset_detail(&args.asset)
        .await
        .with_context(|| format!("Failed to fetch detail for {}", args.asset))?;

    if output == OutputFormat::Json {
        return print_json(&detail);
    }

    println!("{} ({})", detail.name, detail.symbol.to_uppercase());
    println!("{}", RULE);
    println!("Price:               {}", format_price(detail.price));
    println!("Market Cap:          {}", format_large(detail.market_cap));
    println!("Volume (24h):        {}", format_large(detail.volume_24h));
    println!(
        "Range (24h):         {} - {}",
        format_price(detail.low_24h),
        format_price(detail.high_24h)
    );
    println!();
    println!("CHANGE");
    println!("{}", THIN_RULE);
    println!("24h:                 {:.2}%", detail.change_24h);
    println!("7d:                  {:.2}%", detail.change_7d);
    println!("30d:                 {:.2}%", detail.change_30d);
    println!();
    println!("SUPPLY");
    println!("{}", THIN_RULE);
    println!("Circulating:         {}", optional(detail.circulating_supply));
    println!("Total:               {}", optional(detail.total_supply));
    println!();
    println!("EXTREMES");
    println!("{}", THIN_RULE);
    println!(
        "All-time high:       {} ({})",
        format_price(detail.ath),
        detail.ath_date.as_deref().unwrap_or("n/a")
    );
    println!(
        "All-time low:        {} ({})",
        format_price(detail.atl),
        detail.atl_date.as_deref().unwrap_or("n/a")
    );
    println!("{}", RULE);

    Ok(())
}
