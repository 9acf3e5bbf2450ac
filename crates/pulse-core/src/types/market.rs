//! Market snapshot, detail and derivatives records.

use serde::{Deserialize, Serialize};

use super::Instrument;

/// One row of the tracked-universe price snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSnapshot {
    #[serde(rename = "id")]
    pub instrument_id: String,
    pub symbol: String,
    pub name: String,
    pub price: f64,
    /// 24h change in percent
    #[serde(rename = "change24h")]
    pub change_24h: f64,
    #[serde(rename = "volume24h")]
    pub volume_24h: f64,
    pub market_cap: f64,
}

impl PriceSnapshot {
    /// A zero-valued row, used when the provider omits an instrument.
    pub fn empty(instrument: &Instrument) -> Self {
        Self {
            instrument_id: instrument.provider_id.clone(),
            symbol: instrument.symbol.clone(),
            name: instrument.display_name.clone(),
            price: 0.0,
            change_24h: 0.0,
            volume_24h: 0.0,
            market_cap: 0.0,
        }
    }
}

/// Detailed market data for a single asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDetail {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub market_cap: f64,
    #[serde(rename = "volume24h")]
    pub volume_24h: f64,
    #[serde(rename = "change24h")]
    pub change_24h: f64,
    #[serde(rename = "change7d")]
    pub change_7d: f64,
    #[serde(rename = "change30d")]
    pub change_30d: f64,
    #[serde(rename = "high24h")]
    pub high_24h: f64,
    #[serde(rename = "low24h")]
    pub low_24h: f64,
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub ath: f64,
    pub ath_date: Option<String>,
    pub atl: f64,
    pub atl_date: Option<String>,
}

/// Latest funding rate of a perpetual contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingRate {
    /// Funding rate in percent
    pub rate: f64,
    /// Funding time (Unix milliseconds)
    pub time: i64,
}

/// Open interest of a perpetual contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenInterest {
    pub value: f64,
    pub symbol: String,
}

/// Global long/short account ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongShortRatio {
    pub ratio: f64,
    pub long_account: f64,
    pub short_account: f64,
    pub timestamp: i64,
}

/// Futures market metrics for one asset.
///
/// Each metric is independently optional; `available` is set when any is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuturesMetrics {
    pub symbol: String,
    pub funding_rate: Option<FundingRate>,
    pub open_interest: Option<OpenInterest>,
    pub long_short_ratio: Option<LongShortRatio>,
    pub available: bool,
}

impl FuturesMetrics {
    pub fn new(
        symbol: &str,
        funding_rate: Option<FundingRate>,
        open_interest: Option<OpenInterest>,
        long_short_ratio: Option<LongShortRatio>,
    ) -> Self {
        let available =
            funding_rate.is_some() || open_interest.is_some() || long_short_ratio.is_some();
        Self {
            symbol: symbol.to_string(),
            funding_rate,
            open_interest,
            long_short_ratio,
            available,
        }
    }

    /// Record for an asset with no futures data at all.
    pub fn unavailable(symbol: &str) -> Self {
        Self::new(symbol, None, None, None)
    }
}

/// A coin search match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinMatch {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub thumb: Option<String>,
    pub market_cap_rank: Option<u32>,
}
