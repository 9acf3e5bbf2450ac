//! Market data provider trait definitions.

use crate::error::ProviderError;
use crate::types::{AssetDetail, CoinMatch, FuturesMetrics, Instrument, PriceSnapshot, Series};
use async_trait::async_trait;

/// Trait for spot market data providers.
///
/// Implementations perform exactly one logical upstream request per call;
/// pacing and caching are layered on top by the caller.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch current price, 24h change, 24h volume and market cap for a batch.
    ///
    /// # Returns
    /// One row per requested instrument, in request order
    async fn fetch_prices(
        &self,
        instruments: &[Instrument],
    ) -> Result<Vec<PriceSnapshot>, ProviderError>;

    /// Fetch detailed market data for one asset.
    async fn fetch_detail(&self, instrument: &Instrument) -> Result<AssetDetail, ProviderError>;

    /// Fetch price and volume history.
    ///
    /// # Arguments
    /// * `instrument` - The asset to fetch
    /// * `window_days` - Number of days back from now
    ///
    /// # Returns
    /// A series ordered from oldest to newest
    async fn fetch_series(
        &self,
        instrument: &Instrument,
        window_days: u32,
    ) -> Result<Series, ProviderError>;

    /// Search the provider's full coin list.
    async fn search(&self, query: &str) -> Result<Vec<CoinMatch>, ProviderError>;

    /// Get the provider name.
    fn name(&self) -> &str;
}

/// Trait for derivatives (perpetual futures) data providers.
#[async_trait]
pub trait DerivativesProvider: Send + Sync {
    /// Fetch funding rate, open interest and long/short ratio.
    ///
    /// Missing individual metrics are reported as `None`, not as errors.
    async fn fetch_futures(&self, instrument: &Instrument)
        -> Result<FuturesMetrics, ProviderError>;

    /// Get the provider name.
    fn name(&self) -> &str;
}
