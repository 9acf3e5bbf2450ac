//! CoinGecko spot market data client.
//!
//! Uses the free public API (no key). Pacing and caching are not done here:
//! every method performs exactly one request.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use pulse_core::error::ProviderError;
use pulse_core::traits::MarketDataProvider;
use pulse_core::types::{
    AssetDetail, CoinMatch, Granularity, Instrument, PricePoint, PriceSnapshot, Series,
    VolumePoint,
};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::http::{build_client, get_json};

/// Maximum number of search matches returned.
pub const SEARCH_LIMIT: usize = 10;

/// CoinGecko client options.
#[derive(Debug, Clone)]
pub struct CoinGeckoOptions {
    pub base_url: String,
    /// Quote currency, lowercase (e.g. "usd")
    pub quote_currency: String,
    /// Timeout for snapshot, detail and search requests
    pub request_timeout: Duration,
    /// Timeout for history requests
    pub history_timeout: Duration,
    pub user_agent: String,
}

impl Default for CoinGeckoOptions {
    fn default() -> Self {
        Self {
            base_url: "https://api.coingecko.com/api/v3".to_string(),
            quote_currency: "usd".to_string(),
            request_timeout: Duration::from_secs(10),
            history_timeout: Duration::from_secs(15),
            user_agent: concat!("market-pulse/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// `/coins/{id}` response (only the fields we read).
#[derive(Debug, Deserialize)]
pub(crate) struct CoinResponse {
    id: String,
    symbol: String,
    name: String,
    market_data: CoinMarketData,
}

#[derive(Debug, Deserialize)]
struct CoinMarketData {
    #[serde(default)]
    current_price: HashMap<String, f64>,
    #[serde(default)]
    market_cap: HashMap<String, f64>,
    #[serde(default)]
    total_volume: HashMap<String, f64>,
    price_change_percentage_24h: Option<f64>,
    price_change_percentage_7d: Option<f64>,
    price_change_percentage_30d: Option<f64>,
    #[serde(default)]
    high_24h: HashMap<String, f64>,
    #[serde(default)]
    low_24h: HashMap<String, f64>,
    circulating_supply: Option<f64>,
    total_supply: Option<f64>,
    #[serde(default)]
    ath: HashMap<String, f64>,
    #[serde(default)]
    ath_date: HashMap<String, String>,
    #[serde(default)]
    atl: HashMap<String, f64>,
    #[serde(default)]
    atl_date: HashMap<String, String>,
}

/// `/coins/{id}/market_chart` response.
#[derive(Debug, Deserialize)]
pub(crate) struct MarketChartResponse {
    #[serde(default)]
    prices: Vec<(f64, Option<f64>)>,
    #[serde(default)]
    total_volumes: Vec<(f64, Option<f64>)>,
}

/// `/search` response.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    coins: Vec<SearchCoin>,
}

#[derive(Debug, Deserialize)]
struct SearchCoin {
    id: String,
    symbol: String,
    name: String,
    thumb: Option<String>,
    market_cap_rank: Option<u32>,
}

/// `/simple/price` response: coin id -> field -> value.
pub(crate) type SimplePriceResponse = HashMap<String, HashMap<String, Option<f64>>>;

/// One snapshot row per instrument, in instrument order.
///
/// Instruments missing from the response get a zero-valued row.
pub(crate) fn snapshots_from_simple_price(
    instruments: &[Instrument],
    body: &SimplePriceResponse,
    quote: &str,
) -> Vec<PriceSnapshot> {
    let change_key = format!("{}_24h_change", quote);
    let volume_key = format!("{}_24h_vol", quote);
    let cap_key = format!("{}_market_cap", quote);

    instruments
        .iter()
        .map(|instrument| {
            let mut row = PriceSnapshot::empty(instrument);
            if let Some(fields) = body.get(&instrument.provider_id) {
                let field = |key: &str| fields.get(key).copied().flatten().unwrap_or(0.0);
                row.price = field(quote);
                row.change_24h = field(&change_key);
                row.volume_24h = field(&volume_key);
                row.market_cap = field(&cap_key);
            }
            row
        })
        .collect()
}

pub(crate) fn detail_from_coin(body: CoinResponse, quote: &str) -> AssetDetail {
    let md = body.market_data;
    let quoted = |map: &HashMap<String, f64>| map.get(quote).copied().unwrap_or(0.0);

    AssetDetail {
        id: body.id,
        symbol: body.symbol.to_uppercase(),
        name: body.name,
        price: quoted(&md.current_price),
        market_cap: quoted(&md.market_cap),
        volume_24h: quoted(&md.total_volume),
        change_24h: md.price_change_percentage_24h.unwrap_or(0.0),
        change_7d: md.price_change_percentage_7d.unwrap_or(0.0),
        change_30d: md.price_change_percentage_30d.unwrap_or(0.0),
        high_24h: quoted(&md.high_24h),
        low_24h: quoted(&md.low_24h),
        circulating_supply: md.circulating_supply,
        total_supply: md.total_supply,
        ath: quoted(&md.ath),
        ath_date: md.ath_date.get(quote).cloned(),
        atl: quoted(&md.atl),
        atl_date: md.atl_date.get(quote).cloned(),
    }
}

/// Build an ascending series, dropping points with missing or non-finite values.
pub(crate) fn series_from_chart(
    instrument_id: &str,
    window_days: u32,
    body: MarketChartResponse,
) -> Series {
    let finite = |(ts, value): (f64, Option<f64>)| match value {
        Some(v) if ts.is_finite() && v.is_finite() => Some((ts as i64, v)),
        _ => None,
    };

    let prices = body
        .prices
        .into_iter()
        .filter_map(finite)
        .map(|(ts, p)| PricePoint::new(ts, p))
        .collect();
    let volumes = body
        .total_volumes
        .into_iter()
        .filter_map(finite)
        .map(|(ts, v)| VolumePoint::new(ts, v))
        .collect();

    Series::new(instrument_id, window_days, prices, volumes)
}

pub(crate) fn matches_from_search(body: SearchResponse) -> Vec<CoinMatch> {
    body.coins
        .into_iter()
        .take(SEARCH_LIMIT)
        .map(|coin| CoinMatch {
            id: coin.id,
            symbol: coin.symbol.to_uppercase(),
            name: coin.name,
            thumb: coin.thumb,
            market_cap_rank: coin.market_cap_rank,
        })
        .collect()
}

/// CoinGecko API client.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: Client,
    options: CoinGeckoOptions,
}

impl CoinGeckoClient {
    /// Create a new client.
    pub fn new(options: CoinGeckoOptions) -> Result<Self, ProviderError> {
        let client = build_client(&options.user_agent, options.history_timeout)?;
        Ok(Self { client, options })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.options.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoClient {
    async fn fetch_prices(
        &self,
        instruments: &[Instrument],
    ) -> Result<Vec<PriceSnapshot>, ProviderError> {
        let ids = instruments
            .iter()
            .map(|i| i.provider_id.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let quote = &self.options.quote_currency;

        let body: SimplePriceResponse = get_json(
            &self.client,
            "simple/price",
            &self.url("/simple/price"),
            &[
                ("ids", ids),
                ("vs_currencies", quote.clone()),
                ("include_24hr_change", "true".into()),
                ("include_24hr_vol", "true".into()),
                ("include_market_cap", "true".into()),
            ],
            self.options.request_timeout,
        )
        .await?;

        debug!(requested = instruments.len(), returned = body.len(), "Fetched price snapshot");
        Ok(snapshots_from_simple_price(instruments, &body, quote))
    }

    async fn fetch_detail(&self, instrument: &Instrument) -> Result<AssetDetail, ProviderError> {
        let body: CoinResponse = get_json(
            &self.client,
            "coins",
            &self.url(&format!("/coins/{}", instrument.provider_id)),
            &[
                ("localization", "false".into()),
                ("tickers", "false".into()),
                ("community_data", "false".into()),
                ("developer_data", "false".into()),
            ],
            self.options.request_timeout,
        )
        .await?;

        Ok(detail_from_coin(body, &self.options.quote_currency))
    }

    async fn fetch_series(
        &self,
        instrument: &Instrument,
        window_days: u32,
    ) -> Result<Series, ProviderError> {
        let granularity = Granularity::for_window(window_days);

        let body: MarketChartResponse = get_json(
            &self.client,
            "market_chart",
            &self.url(&format!("/coins/{}/market_chart", instrument.provider_id)),
            &[
                ("vs_currency", self.options.quote_currency.clone()),
                ("days", window_days.to_string()),
                ("interval", granularity.as_param().to_string()),
            ],
            self.options.history_timeout,
        )
        .await?;

        let series = series_from_chart(&instrument.provider_id, window_days, body);
        debug!(
            instrument = %instrument.provider_id,
            window_days,
            %granularity,
            points = series.len(),
            "Fetched historical series"
        );
        Ok(series)
    }

    async fn search(&self, query: &str) -> Result<Vec<CoinMatch>, ProviderError> {
        let body: SearchResponse = get_json(
            &self.client,
            "search",
            &self.url("/search"),
            &[("query", query.to_string())],
            self.options.request_timeout,
        )
        .await?;

        Ok(matches_from_search(body))
    }

    fn name(&self) -> &str {
        "coingecko"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instruments() -> Vec<Instrument> {
        vec![
            Instrument::new("bitcoin", "BTC", "Bitcoin"),
            Instrument::new("ethereum", "ETH", "Ethereum"),
            Instrument::new("vechain", "VET", "VeChain"),
        ]
    }

    #[test]
    fn test_snapshot_rows_follow_instrument_order() {
        let body: SimplePriceResponse = serde_json::from_str(
            r#"{
                "ethereum": {"usd": 3000.5, "usd_24h_change": -1.25, "usd_24h_vol": 1.5e10, "usd_market_cap": 3.6e11},
                "bitcoin": {"usd": 65000.0, "usd_24h_change": 2.0, "usd_24h_vol": 3.0e10, "usd_market_cap": null}
            }"#,
        )
        .unwrap();

        let rows = snapshots_from_simple_price(&instruments(), &body, "usd");

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].instrument_id, "bitcoin");
        assert_eq!(rows[0].price, 65000.0);
        assert_eq!(rows[0].market_cap, 0.0);
        assert_eq!(rows[1].change_24h, -1.25);
        // Missing from the response: zero row
        assert_eq!(rows[2].symbol, "VET");
        assert_eq!(rows[2].price, 0.0);
    }

    #[test]
    fn test_detail_conversion() {
        let body: CoinResponse = serde_json::from_str(
            r#"{
                "id": "solana",
                "symbol": "sol",
                "name": "Solana",
                "market_data": {
                    "current_price": {"usd": 150.0, "eur": 140.0},
                    "market_cap": {"usd": 7.0e10},
                    "total_volume": {"usd": 2.0e9},
                    "price_change_percentage_24h": 3.5,
                    "price_change_percentage_7d": null,
                    "price_change_percentage_30d": -12.0,
                    "high_24h": {"usd": 155.0},
                    "low_24h": {"usd": 144.0},
                    "circulating_supply": 4.6e8,
                    "total_supply": null,
                    "ath": {"usd": 260.0},
                    "ath_date": {"usd": "2021-11-06T21:54:35.825Z"},
                    "atl": {"usd": 0.5},
                    "atl_date": {"usd": "2020-05-11T19:35:23.449Z"}
                }
            }"#,
        )
        .unwrap();

        let detail = detail_from_coin(body, "usd");
        assert_eq!(detail.symbol, "SOL");
        assert_eq!(detail.price, 150.0);
        assert_eq!(detail.change_7d, 0.0);
        assert_eq!(detail.change_30d, -12.0);
        assert_eq!(detail.total_supply, None);
        assert_eq!(detail.ath_date.as_deref(), Some("2021-11-06T21:54:35.825Z"));
    }

    #[test]
    fn test_series_is_sorted_and_filtered() {
        let body: MarketChartResponse = serde_json::from_str(
            r#"{
                "prices": [[1700000200000, 3.0], [1700000000000, 1.0], [1700000100000, null]],
                "total_volumes": [[1700000000000, 10.0], [1700000200000, 30.0]]
            }"#,
        )
        .unwrap();

        let series = series_from_chart("bitcoin", 1, body);

        assert_eq!(series.price_values(), vec![1.0, 3.0]);
        assert_eq!(series.volume_values(), vec![10.0, 30.0]);
        assert_eq!(series.granularity(), Granularity::Hourly);
        assert!(series.validate().is_ok());
    }

    #[test]
    fn test_search_is_capped() {
        let coins: Vec<String> = (0..15)
            .map(|i| {
                format!(
                    r#"{{"id": "coin-{0}", "symbol": "c{0}", "name": "Coin {0}", "thumb": null, "market_cap_rank": {0}}}"#,
                    i
                )
            })
            .collect();
        let body: SearchResponse =
            serde_json::from_str(&format!(r#"{{"coins": [{}]}}"#, coins.join(","))).unwrap();

        let matches = matches_from_search(body);
        assert_eq!(matches.len(), SEARCH_LIMIT);
        assert_eq!(matches[3].symbol, "C3");
        assert_eq!(matches[3].market_cap_rank, Some(3));
    }

    #[test]
    fn test_client_builds() {
        let client = CoinGeckoClient::new(CoinGeckoOptions::default()).unwrap();
        assert_eq!(client.url("/search"), "https://api.coingecko.com/api/v3/search");
        assert_eq!(client.name(), "coingecko");
    }
}
