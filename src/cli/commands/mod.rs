//! CLI command implementations.

pub mod analyze;
pub mod detail;
pub mod futures;
pub mod history;
pub mod instruments;
pub mod prices;
pub mod search;
pub mod validate;

use anyhow::{Context, Result};
use pulse_config::AppConfig;
use pulse_data::{
    BinanceFuturesClient, BinanceOptions, CacheTtls, CoinGeckoClient, CoinGeckoOptions, Gateway,
    GatewayOptions, MarketDataService, ServiceOptions,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const RULE: &str = "═══════════════════════════════════════════════════════════";
pub const THIN_RULE: &str = "───────────────────────────────────────────────────────────";

/// Wire the providers, gateway and caches described by `config`.
pub fn build_service(config: &AppConfig) -> Result<MarketDataService> {
    let provider = &config.provider;

    let coingecko = CoinGeckoClient::new(CoinGeckoOptions {
        base_url: provider.coingecko_base_url.clone(),
        quote_currency: provider.quote_currency.to_lowercase(),
        request_timeout: provider.request_timeout(),
        history_timeout: provider.history_timeout(),
        user_agent: provider.user_agent.clone(),
    })
    .context("Failed to create CoinGecko client")?;

    let binance = BinanceFuturesClient::new(BinanceOptions {
        base_url: provider.binance_futures_base_url.clone(),
        request_timeout: provider.request_timeout(),
        user_agent: provider.user_agent.clone(),
    })
    .context("Failed to create Binance futures client")?;

    let gateway = Arc::new(Gateway::new(GatewayOptions {
        min_delay: config.gateway.min_delay(),
        call_timeout: config.gateway.call_timeout(),
    }));

    let options = ServiceOptions {
        ttls: CacheTtls {
            price: Duration::from_secs(config.cache.price_ttl_secs),
            detail: Duration::from_secs(config.cache.detail_ttl_secs),
            history: Duration::from_secs(config.cache.history_ttl_secs),
            futures: Duration::from_secs(config.cache.futures_ttl_secs),
        },
        analysis_window_days: config.analysis.window_days,
    };

    debug!(
        instruments = config.instruments.len(),
        min_delay_ms = config.gateway.min_delay_ms,
        "Market data service ready"
    );

    Ok(MarketDataService::new(
        config.universe(),
        gateway,
        Arc::new(coingecko),
        Arc::new(binance),
        options,
    ))
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Price with precision suited to its magnitude.
pub fn format_price(price: f64) -> String {
    if price.abs() >= 1.0 {
        format!("{:.2}", price)
    } else {
        format!("{:.6}", price)
    }
}

/// Large quantity with a T/B/M/K suffix.
pub fn format_large(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e12 {
        format!("{:.2}T", value / 1e12)
    } else if abs >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2}K", value / 1e3)
    } else {
        format!("{:.2}", value)
    }
}
