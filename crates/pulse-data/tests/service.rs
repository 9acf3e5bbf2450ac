//! Service behavior against an in-process fake provider.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use pulse_analysis::IndicatorEngine;
use pulse_core::error::{DataError, ProviderError, PulseError};
use pulse_core::traits::{DerivativesProvider, MarketDataProvider};
use pulse_core::types::{
    AssetDetail, CoinMatch, FundingRate, FuturesMetrics, Instrument, OpenInterest, PriceSnapshot,
    Series, Universe,
};
use pulse_data::{CacheTtls, Gateway, GatewayOptions, MarketDataService, ServiceOptions};

#[derive(Default)]
struct FakeProvider {
    failing: AtomicBool,
    empty_series: AtomicBool,
    partial_futures: AtomicBool,
    price_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    series_calls: AtomicUsize,
    search_calls: AtomicUsize,
    futures_calls: AtomicUsize,
}

impl FakeProvider {
    fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), ProviderError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(ProviderError::Status {
                status: 429,
                body: "Too Many Requests".into(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MarketDataProvider for FakeProvider {
    async fn fetch_prices(
        &self,
        instruments: &[Instrument],
    ) -> Result<Vec<PriceSnapshot>, ProviderError> {
        let call = self.price_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.check()?;
        Ok(instruments
            .iter()
            .map(|i| {
                let mut row = PriceSnapshot::empty(i);
                row.price = call as f64;
                row
            })
            .collect())
    }

    async fn fetch_detail(&self, instrument: &Instrument) -> Result<AssetDetail, ProviderError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(AssetDetail {
            id: instrument.provider_id.clone(),
            symbol: instrument.symbol.clone(),
            name: instrument.display_name.clone(),
            price: 100.0,
            market_cap: 1.0e9,
            volume_24h: 1.0e7,
            change_24h: 1.0,
            change_7d: 2.0,
            change_30d: 3.0,
            high_24h: 101.0,
            low_24h: 99.0,
            circulating_supply: Some(1.0e7),
            total_supply: None,
            ath: 200.0,
            ath_date: None,
            atl: 1.0,
            atl_date: None,
        })
    }

    async fn fetch_series(
        &self,
        instrument: &Instrument,
        window_days: u32,
    ) -> Result<Series, ProviderError> {
        let call = self.series_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        if self.empty_series.load(Ordering::SeqCst) {
            return Ok(Series::new(&instrument.provider_id, window_days, vec![], vec![]));
        }
        let prices: Vec<f64> = (0..window_days)
            .map(|i| 100.0 + i as f64 + call as f64 * 1000.0)
            .collect();
        let volumes = vec![1_000.0; window_days as usize];
        Ok(Series::from_values(&instrument.provider_id, &prices, &volumes))
    }

    async fn search(&self, query: &str) -> Result<Vec<CoinMatch>, ProviderError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(vec![CoinMatch {
            id: query.to_lowercase(),
            symbol: query.to_uppercase(),
            name: query.to_string(),
            thumb: None,
            market_cap_rank: Some(1),
        }])
    }

    fn name(&self) -> &str {
        "fake"
    }
}

#[async_trait]
impl DerivativesProvider for FakeProvider {
    async fn fetch_futures(
        &self,
        instrument: &Instrument,
    ) -> Result<FuturesMetrics, ProviderError> {
        self.futures_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        if self.partial_futures.load(Ordering::SeqCst) {
            // Open interest endpoint down, funding still answering
            return Ok(FuturesMetrics::new(
                &instrument.symbol,
                Some(FundingRate {
                    rate: 0.01,
                    time: 1_700_006_400_000,
                }),
                None,
                None,
            ));
        }
        Ok(FuturesMetrics::new(
            &instrument.symbol,
            None,
            Some(OpenInterest {
                value: 42.0,
                symbol: instrument.perpetual_symbol(),
            }),
            None,
        ))
    }

    fn name(&self) -> &str {
        "fake"
    }
}

fn universe() -> Universe {
    Universe::new(vec![
        Instrument::new("bitcoin", "BTC", "Bitcoin"),
        Instrument::new("ethereum", "ETH", "Ethereum"),
        Instrument::new("monero", "XMR", "Monero"),
    ])
}

fn service_with(
    provider: Arc<FakeProvider>,
    min_delay: Duration,
    ttls: CacheTtls,
) -> MarketDataService {
    let gateway = Arc::new(Gateway::new(GatewayOptions {
        min_delay,
        call_timeout: Duration::from_secs(5),
    }));
    MarketDataService::new(
        universe(),
        gateway,
        provider.clone(),
        provider,
        ServiceOptions {
            ttls,
            analysis_window_days: 30,
        },
    )
}

fn service(provider: Arc<FakeProvider>) -> MarketDataService {
    service_with(provider, Duration::ZERO, CacheTtls::default())
}

/// TTLs of zero force every call to refetch.
fn expired() -> CacheTtls {
    CacheTtls {
        price: Duration::ZERO,
        detail: Duration::ZERO,
        history: Duration::ZERO,
        futures: Duration::ZERO,
    }
}

#[tokio::test]
async fn snapshot_within_ttl_fetches_once() {
    let provider = Arc::new(FakeProvider::default());
    let svc = service(provider.clone());

    let first = svc.price_snapshot().await.unwrap();
    let second = svc.price_snapshot().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
    assert_eq!(first[2].symbol, "XMR");
    assert_eq!(provider.price_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn expired_snapshot_with_failing_fetch_serves_previous() {
    let provider = Arc::new(FakeProvider::default());
    let svc = service_with(provider.clone(), Duration::ZERO, expired());

    let first = svc.price_snapshot().await.unwrap();
    provider.fail(true);
    let second = svc.price_snapshot().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(provider.price_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn cold_failure_reaches_caller() {
    let provider = Arc::new(FakeProvider::default());
    provider.fail(true);
    let svc = service(provider.clone());

    let err = svc.asset_detail("bitcoin").await.unwrap_err();
    assert!(matches!(
        err,
        PulseError::Provider(ProviderError::Status { status: 429, .. })
    ));
    assert_eq!(svc.cache_sizes().details, 0);
}

#[tokio::test]
async fn unknown_instrument_never_reaches_provider() {
    let provider = Arc::new(FakeProvider::default());
    let svc = service(provider.clone());

    let err = svc.historical_series("notacoin", 7).await.unwrap_err();
    assert!(err.is_not_found());

    let err = svc.futures_metrics("notacoin").await.unwrap_err();
    assert!(err.is_not_found());

    assert_eq!(provider.series_calls.load(Ordering::SeqCst), 0);
    assert_eq!(provider.futures_calls.load(Ordering::SeqCst), 0);
    assert_eq!(svc.gateway_stats().calls, 0);
}

#[tokio::test]
async fn detail_resolves_by_symbol() {
    let provider = Arc::new(FakeProvider::default());
    let svc = service(provider.clone());

    let by_symbol = svc.asset_detail("eth").await.unwrap();
    let by_id = svc.asset_detail("ethereum").await.unwrap();

    assert_eq!(by_symbol, by_id);
    assert_eq!(provider.detail_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn history_is_cached_per_window() {
    let provider = Arc::new(FakeProvider::default());
    let svc = service(provider.clone());

    let week = svc.historical_series("bitcoin", 7).await.unwrap();
    let month = svc.historical_series("bitcoin", 30).await.unwrap();
    let week_again = svc.historical_series("BTC", 7).await.unwrap();

    assert_eq!(week.len(), 7);
    assert_eq!(month.len(), 30);
    assert_eq!(week, week_again);
    assert_eq!(provider.series_calls.load(Ordering::SeqCst), 2);
    assert_eq!(svc.cache_sizes().history, 2);
}

#[tokio::test]
async fn empty_series_does_not_replace_cached_one() {
    let provider = Arc::new(FakeProvider::default());
    let svc = service_with(provider.clone(), Duration::ZERO, expired());

    let good = svc.historical_series("bitcoin", 7).await.unwrap();
    provider.empty_series.store(true, Ordering::SeqCst);
    let again = svc.historical_series("bitcoin", 7).await.unwrap();

    assert_eq!(good, again);
}

#[tokio::test]
async fn zero_window_is_rejected() {
    let svc = service(Arc::new(FakeProvider::default()));
    let err = svc.historical_series("bitcoin", 0).await.unwrap_err();
    assert!(matches!(err, PulseError::Data(DataError::InvalidQuery(_))));
}

#[tokio::test]
async fn futures_cold_failure_is_unavailable_record() {
    let provider = Arc::new(FakeProvider::default());
    provider.fail(true);
    let svc = service(provider.clone());

    let metrics = svc.futures_metrics("monero").await.unwrap();
    assert!(!metrics.available);
    assert_eq!(metrics.symbol, "XMR");
    // Not cached, so a later success is picked up
    provider.fail(false);
    let metrics = svc.futures_metrics("monero").await.unwrap();
    assert!(metrics.available);
    assert_eq!(metrics.open_interest.unwrap().symbol, "XMRUSDT");
}

#[tokio::test]
async fn futures_failure_after_success_serves_stale() {
    let provider = Arc::new(FakeProvider::default());
    let svc = service_with(provider.clone(), Duration::ZERO, expired());

    assert!(svc.futures_metrics("bitcoin").await.unwrap().available);
    provider.fail(true);
    assert!(svc.futures_metrics("bitcoin").await.unwrap().available);
}

#[tokio::test]
async fn partial_futures_record_replaces_entry_but_outage_does_not() {
    let provider = Arc::new(FakeProvider::default());
    let svc = service_with(provider.clone(), Duration::ZERO, expired());

    let full = svc.futures_metrics("bitcoin").await.unwrap();
    assert!(full.open_interest.is_some());

    provider.partial_futures.store(true, Ordering::SeqCst);
    let partial = svc.futures_metrics("bitcoin").await.unwrap();
    assert!(partial.available);
    assert!(partial.open_interest.is_none());
    assert!(partial.funding_rate.is_some());

    provider.fail(true);
    let during_outage = svc.futures_metrics("bitcoin").await.unwrap();
    assert_eq!(during_outage, partial);
    assert_eq!(provider.futures_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn short_search_query_is_rejected_without_call() {
    let provider = Arc::new(FakeProvider::default());
    let svc = service(provider.clone());

    let err = svc.search(" b ").await.unwrap_err();
    assert!(matches!(err, PulseError::Data(DataError::InvalidQuery(_))));
    assert_eq!(provider.search_calls.load(Ordering::SeqCst), 0);

    // Search is never cached
    svc.search("pepe").await.unwrap();
    svc.search("pepe").await.unwrap();
    assert_eq!(provider.search_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn all_resources_share_one_pacing_slot() {
    let provider = Arc::new(FakeProvider::default());
    let delay = Duration::from_millis(40);
    let svc = service_with(provider.clone(), delay, CacheTtls::default());
    let start = Instant::now();

    svc.price_snapshot().await.unwrap();
    svc.asset_detail("bitcoin").await.unwrap();
    svc.historical_series("bitcoin", 7).await.unwrap();
    svc.futures_metrics("bitcoin").await.unwrap();
    svc.search("sol").await.unwrap();

    assert!(start.elapsed() >= delay * 4);
    assert_eq!(svc.gateway_stats().calls, 5);

    // Cache hits skip the gateway entirely
    let before = Instant::now();
    svc.price_snapshot().await.unwrap();
    svc.asset_detail("bitcoin").await.unwrap();
    assert!(before.elapsed() < delay);
    assert_eq!(svc.gateway_stats().calls, 5);
}

#[tokio::test]
async fn concurrent_requests_are_paced() {
    let provider = Arc::new(FakeProvider::default());
    let delay = Duration::from_millis(30);
    let svc = Arc::new(service_with(provider.clone(), delay, CacheTtls::default()));
    let start = Instant::now();

    let tasks: Vec<_> = ["bitcoin", "ethereum", "monero"]
        .into_iter()
        .map(|id| {
            let svc = svc.clone();
            tokio::spawn(async move { svc.asset_detail(id).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert!(start.elapsed() >= delay * 2);
    assert_eq!(provider.detail_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn analyze_uses_configured_window() {
    let provider = Arc::new(FakeProvider::default());
    let svc = service(provider.clone());
    let engine = IndicatorEngine::default();

    let report = svc.analyze("bitcoin", &engine).await.unwrap();

    assert_eq!(report.instrument_id, "bitcoin");
    assert!(svc.historical_series("bitcoin", 30).await.is_ok());
    assert_eq!(provider.series_calls.load(Ordering::SeqCst), 1);
}
