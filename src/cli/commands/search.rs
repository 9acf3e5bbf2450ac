//! Coin search command.

use anyhow::{Context, Result};
use pulse_config::AppConfig;

use super::{build_service, print_json, RULE};
use crate::cli::{OutputFormat, SearchArgs};

pub async fn run(args: SearchArgs, config: &AppConfig, output: OutputFormat) -> Result<()> {
    let service = build_service(config)?;
    let matches = service
        .search(&args.query)
        .await
        .with_context(|| format!("Search for {:?} failed", args.query))?;

    if output == OutputFormat::Json {
        return print_json(&matches);
    }

    println!("SEARCH: {}", args.query);
    println!("{}", RULE);
    if matches.is_empty() {
        println!("No matches.");
    }
    for m in &matches {
        let rank = m
            .market_cap_rank
            .map(|r| format!("#{}", r))
            .unwrap_or_else(|| "-".to_string());
        println!("  {:<6} {:<8} {:<24} {}", rank, m.symbol, m.name, m.id);
    }
    println!("{}", RULE);

    Ok(())
}
