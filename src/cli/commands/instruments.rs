//! List tracked instruments command.

use anyhow::Result;
use pulse_config::AppConfig;

use super::{print_json, RULE, THIN_RULE};
use crate::cli::OutputFormat;

pub fn run(config: &AppConfig, output: OutputFormat) -> Result<()> {
    let universe = config.universe();

    if output == OutputFormat::Json {
        return print_json(&universe.instruments());
    }

    println!("Tracked Assets ({})", universe.len());
    println!("{}", RULE);
    println!("  {:<8} {:<20} {}", "SYMBOL", "NAME", "ID");
    println!("  {}", THIN_RULE);
    for instrument in universe.instruments() {
        println!(
            "  {:<8} {:<20} {}",
            instrument.symbol, instrument.display_name, instrument.provider_id
        );
    }
    println!();
    println!("Assets can be referred to by id or symbol.");

    Ok(())
}
