//! Binance USDⓈ-M futures client (funding, open interest, long/short ratio).

use std::time::Duration;

use async_trait::async_trait;
use pulse_core::error::ProviderError;
use pulse_core::traits::DerivativesProvider;
use pulse_core::types::{FundingRate, FuturesMetrics, Instrument, LongShortRatio, OpenInterest};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::http::{build_client, get_json};

/// Binance futures client options.
#[derive(Debug, Clone)]
pub struct BinanceOptions {
    pub base_url: String,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for BinanceOptions {
    fn default() -> Self {
        Self {
            base_url: "https://fapi.binance.com".to_string(),
            request_timeout: Duration::from_secs(10),
            user_agent: concat!("market-pulse/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

// Binance encodes decimals as strings.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FundingRateRow {
    funding_rate: String,
    funding_time: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OpenInterestBody {
    open_interest: String,
    symbol: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LongShortRow {
    long_short_ratio: String,
    long_account: String,
    short_account: String,
    timestamp: i64,
}

fn decimal(field: &str, raw: &str) -> Result<f64, ProviderError> {
    raw.parse::<f64>()
        .map_err(|e| ProviderError::Decode(format!("{} {:?}: {}", field, raw, e)))
}

/// Latest funding rate, converted to percent.
pub(crate) fn funding_from_rows(rows: &[FundingRateRow]) -> Result<Option<FundingRate>, ProviderError> {
    rows.first()
        .map(|row| {
            Ok(FundingRate {
                rate: decimal("fundingRate", &row.funding_rate)? * 100.0,
                time: row.funding_time,
            })
        })
        .transpose()
}

pub(crate) fn open_interest_from_body(body: &OpenInterestBody) -> Result<OpenInterest, ProviderError> {
    Ok(OpenInterest {
        value: decimal("openInterest", &body.open_interest)?,
        symbol: body.symbol.clone(),
    })
}

pub(crate) fn long_short_from_rows(
    rows: &[LongShortRow],
) -> Result<Option<LongShortRatio>, ProviderError> {
    rows.first()
        .map(|row| {
            Ok(LongShortRatio {
                ratio: decimal("longShortRatio", &row.long_short_ratio)?,
                long_account: decimal("longAccount", &row.long_account)?,
                short_account: decimal("shortAccount", &row.short_account)?,
                timestamp: row.timestamp,
            })
        })
        .transpose()
}

/// Binance futures API client.
#[derive(Debug, Clone)]
pub struct BinanceFuturesClient {
    client: Client,
    options: BinanceOptions,
}

impl BinanceFuturesClient {
    /// Create a new client.
    pub fn new(options: BinanceOptions) -> Result<Self, ProviderError> {
        let client = build_client(&options.user_agent, options.request_timeout)?;
        Ok(Self { client, options })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.options.base_url.trim_end_matches('/'), path)
    }

    async fn funding_rate(&self, symbol: &str) -> Result<Option<FundingRate>, ProviderError> {
        let rows: Vec<FundingRateRow> = get_json(
            &self.client,
            "fundingRate",
            &self.url("/fapi/v1/fundingRate"),
            &[("symbol", symbol.to_string()), ("limit", "1".into())],
            self.options.request_timeout,
        )
        .await?;
        funding_from_rows(&rows)
    }

    async fn open_interest(&self, symbol: &str) -> Result<OpenInterest, ProviderError> {
        let body: OpenInterestBody = get_json(
            &self.client,
            "openInterest",
            &self.url("/fapi/v1/openInterest"),
            &[("symbol", symbol.to_string())],
            self.options.request_timeout,
        )
        .await?;
        open_interest_from_body(&body)
    }

    async fn long_short_ratio(&self, symbol: &str) -> Result<Option<LongShortRatio>, ProviderError> {
        let rows: Vec<LongShortRow> = get_json(
            &self.client,
            "globalLongShortAccountRatio",
            &self.url("/futures/data/globalLongShortAccountRatio"),
            &[
                ("symbol", symbol.to_string()),
                ("period", "5m".into()),
                ("limit", "1".into()),
            ],
            self.options.request_timeout,
        )
        .await?;
        long_short_from_rows(&rows)
    }
}

/// Keep a metric that loaded, log and drop one that did not.
fn optional<T>(metric: &str, symbol: &str, result: Result<Option<T>, ProviderError>) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(err) => {
            debug!(metric, symbol, error = %err, "Futures metric not available");
            None
        }
    }
}

/// Merge the three metric lookups into one record.
///
/// A metric that failed is dropped as long as another one answered. When
/// all three fail the first error is returned, so the caller can fall back
/// to a cached record instead of storing an empty one.
pub(crate) fn combine_metrics(
    symbol: &str,
    pair: &str,
    funding: Result<Option<FundingRate>, ProviderError>,
    open_interest: Result<OpenInterest, ProviderError>,
    long_short: Result<Option<LongShortRatio>, ProviderError>,
) -> Result<FuturesMetrics, ProviderError> {
    match (funding, open_interest, long_short) {
        (Err(err), Err(_), Err(_)) => Err(err),
        (funding, open_interest, long_short) => Ok(FuturesMetrics::new(
            symbol,
            optional("funding rate", pair, funding),
            optional("open interest", pair, open_interest.map(Some)),
            optional("long/short ratio", pair, long_short),
        )),
    }
}

#[async_trait]
impl DerivativesProvider for BinanceFuturesClient {
    async fn fetch_futures(
        &self,
        instrument: &Instrument,
    ) -> Result<FuturesMetrics, ProviderError> {
        let pair = instrument.perpetual_symbol();

        let funding = self.funding_rate(&pair).await;
        let open_interest = self.open_interest(&pair).await;
        let long_short = self.long_short_ratio(&pair).await;

        combine_metrics(&instrument.symbol, &pair, funding, open_interest, long_short)
    }

    fn name(&self) -> &str {
        "binance-futures"
    }
}
