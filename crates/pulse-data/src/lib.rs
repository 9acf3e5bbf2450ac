//! Market data access for market-pulse.
//!
//! Upstream requests are paced by a single [`Gateway`] and their results
//! held in [`StaleCache`]s that fall back to expired entries when the
//! provider is unreachable.

mod binance;
mod cache;
mod coingecko;
mod csv_source;
mod gateway;
mod http;
mod service;

pub use binance::{BinanceFuturesClient, BinanceOptions};
pub use cache::{CacheEntry, Fetched, Freshness, StaleCache};
pub use coingecko::{CoinGeckoClient, CoinGeckoOptions, SEARCH_LIMIT};
pub use csv_source::CsvSeriesSource;
pub use gateway::{Gateway, GatewayOptions, GatewayStats};
pub use service::{CacheSizes, CacheTtls, MarketDataService, ServiceOptions, MIN_QUERY_LEN};
