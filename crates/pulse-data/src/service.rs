//! Market data service.
//!
//! Combines the tracked universe, the pacing gateway and one stale-tolerant
//! cache per resource kind. Every upstream request made here goes through
//! the same gateway.

use std::sync::Arc;
use std::time::Duration;

use pulse_analysis::{AnalysisReport, IndicatorEngine};
use pulse_core::error::{DataError, ProviderError, PulseResult};
use pulse_core::traits::{DerivativesProvider, MarketDataProvider};
use pulse_core::types::{
    AssetDetail, CoinMatch, FuturesMetrics, Instrument, PriceSnapshot, Series, Universe,
};
use tracing::{info, warn};

use crate::cache::StaleCache;
use crate::gateway::{Gateway, GatewayStats};

/// Shortest accepted search query.
pub const MIN_QUERY_LEN: usize = 2;

/// Cache key of the whole-universe price snapshot.
const PRICES_KEY: &str = "prices";

/// Time-to-live per resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub price: Duration,
    pub detail: Duration,
    pub history: Duration,
    pub futures: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            price: Duration::from_secs(60),
            detail: Duration::from_secs(60),
            history: Duration::from_secs(7200),
            futures: Duration::from_secs(300),
        }
    }
}

/// Service options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOptions {
    pub ttls: CacheTtls,
    /// History window used by [`MarketDataService::analyze`]
    pub analysis_window_days: u32,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            ttls: CacheTtls::default(),
            analysis_window_days: 30,
        }
    }
}

/// Number of entries held by each cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheSizes {
    pub prices: usize,
    pub details: usize,
    pub history: usize,
    pub futures: usize,
}

fn history_key(instrument: &Instrument, window_days: u32) -> String {
    format!("{}_{}", instrument.provider_id, window_days)
}

fn futures_key(instrument: &Instrument) -> String {
    format!("futures_{}", instrument.provider_id)
}

/// Cached, paced access to market data for the tracked universe.
pub struct MarketDataService {
    universe: Universe,
    gateway: Arc<Gateway>,
    market: Arc<dyn MarketDataProvider>,
    derivatives: Arc<dyn DerivativesProvider>,
    options: ServiceOptions,
    prices: StaleCache<Vec<PriceSnapshot>>,
    details: StaleCache<AssetDetail>,
    history: StaleCache<Series>,
    futures: StaleCache<FuturesMetrics>,
}

impl MarketDataService {
    /// Create a new service.
    pub fn new(
        universe: Universe,
        gateway: Arc<Gateway>,
        market: Arc<dyn MarketDataProvider>,
        derivatives: Arc<dyn DerivativesProvider>,
        options: ServiceOptions,
    ) -> Self {
        Self {
            universe,
            gateway,
            market,
            derivatives,
            options,
            prices: StaleCache::new("prices"),
            details: StaleCache::new("details"),
            history: StaleCache::new("history"),
            futures: StaleCache::new("futures"),
        }
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn options(&self) -> ServiceOptions {
        self.options
    }

    pub fn gateway_stats(&self) -> GatewayStats {
        self.gateway.stats()
    }

    pub fn cache_sizes(&self) -> CacheSizes {
        CacheSizes {
            prices: self.prices.len(),
            details: self.details.len(),
            history: self.history.len(),
            futures: self.futures.len(),
        }
    }

    /// Current price row for every tracked instrument.
    pub async fn price_snapshot(&self) -> PulseResult<Vec<PriceSnapshot>> {
        let rows = self
            .prices
            .get_or_fetch(PRICES_KEY, self.options.ttls.price, || {
                self.gateway.execute(
                    "price snapshot",
                    self.market.fetch_prices(self.universe.instruments()),
                )
            })
            .await?;
        Ok(rows)
    }

    /// Detailed market data for one instrument (id or symbol).
    pub async fn asset_detail(&self, key: &str) -> PulseResult<AssetDetail> {
        let instrument = self.universe.resolve(key)?;

        let detail = self
            .details
            .get_or_fetch(&instrument.provider_id, self.options.ttls.detail, || {
                self.gateway
                    .execute("asset detail", self.market.fetch_detail(instrument))
            })
            .await?;
        Ok(detail)
    }

    /// Price and volume history for one instrument over `window_days`.
    pub async fn historical_series(&self, key: &str, window_days: u32) -> PulseResult<Series> {
        let instrument = self.universe.resolve(key)?;
        if window_days == 0 {
            return Err(DataError::InvalidQuery("window must be at least 1 day".into()).into());
        }

        let series = self
            .history
            .get_or_fetch(
                &history_key(instrument, window_days),
                self.options.ttls.history,
                || async move {
                    let series = self
                        .gateway
                        .execute(
                            "historical series",
                            self.market.fetch_series(instrument, window_days),
                        )
                        .await?;
                    // An unusable series must not replace a good cached one
                    series
                        .validate()
                        .map_err(|e| ProviderError::Decode(e.to_string()))?;
                    Ok::<_, ProviderError>(series)
                },
            )
            .await?;
        Ok(series)
    }

    /// Perpetual futures metrics for one instrument.
    ///
    /// Upstream failure with nothing cached yields an unavailable record
    /// rather than an error; only an unknown instrument is an error.
    pub async fn futures_metrics(&self, key: &str) -> PulseResult<FuturesMetrics> {
        let instrument = self.universe.resolve(key)?;

        let result = self
            .futures
            .get_or_fetch(&futures_key(instrument), self.options.ttls.futures, || {
                self.gateway
                    .execute("futures metrics", self.derivatives.fetch_futures(instrument))
            })
            .await;

        match result {
            Ok(metrics) => Ok(metrics),
            Err(err) => {
                warn!(instrument = %instrument.provider_id, error = %err, "Futures metrics unavailable");
                Ok(FuturesMetrics::unavailable(&instrument.symbol))
            }
        }
    }

    /// Search the provider's coin list. Not cached.
    pub async fn search(&self, query: &str) -> PulseResult<Vec<CoinMatch>> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Err(DataError::InvalidQuery(format!(
                "query must be at least {} characters",
                MIN_QUERY_LEN
            ))
            .into());
        }

        let matches = self
            .gateway
            .execute("search", self.market.search(query))
            .await?;
        Ok(matches)
    }

    /// Analyze one instrument over the configured window.
    pub async fn analyze(&self, key: &str, engine: &IndicatorEngine) -> PulseResult<AnalysisReport> {
        let series = self
            .historical_series(key, self.options.analysis_window_days)
            .await?;
        let report = engine.analyze(&series);

        info!(
            instrument = %series.instrument_id,
            signal = %report.overall.signal,
            confidence = report.overall.confidence,
            "Analysis generated"
        );
        Ok(report)
    }
}
