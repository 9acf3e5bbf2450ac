//! Price and volume time series.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Granularity;
use crate::error::DataError;

/// A single price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Quoted price
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp: i64, price: f64) -> Self {
        Self { timestamp, price }
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or_default()
    }
}

/// A single traded-volume observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumePoint {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Traded volume in quote currency
    pub volume: f64,
}

impl VolumePoint {
    pub fn new(timestamp: i64, volume: f64) -> Self {
        Self { timestamp, volume }
    }
}

/// Price and volume history for one instrument over one window.
///
/// Both sequences are ascending by timestamp; the last element is "now".
/// Indicator math relies on that ordering, so constructors sort their input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SeriesData")]
pub struct Series {
    /// Provider id of the instrument
    pub instrument_id: String,
    /// Requested window length in days
    pub window_days: u32,
    prices: Vec<PricePoint>,
    volumes: Vec<VolumePoint>,
}

/// Wire form of [`Series`]; decoding goes through [`Series::new`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeriesData {
    instrument_id: String,
    window_days: u32,
    #[serde(default)]
    prices: Vec<PricePoint>,
    #[serde(default)]
    volumes: Vec<VolumePoint>,
}

impl From<SeriesData> for Series {
    fn from(data: SeriesData) -> Self {
        Series::new(data.instrument_id, data.window_days, data.prices, data.volumes)
    }
}

impl Series {
    /// Build a series, sorting both sequences ascending by timestamp.
    pub fn new(
        instrument_id: impl Into<String>,
        window_days: u32,
        mut prices: Vec<PricePoint>,
        mut volumes: Vec<VolumePoint>,
    ) -> Self {
        prices.sort_by_key(|p| p.timestamp);
        volumes.sort_by_key(|v| v.timestamp);
        Self {
            instrument_id: instrument_id.into(),
            window_days,
            prices,
            volumes,
        }
    }

    /// Build a series from bare values, assigning one-day spaced timestamps.
    ///
    /// Handy for synthetic data; volumes may be shorter than prices.
    pub fn from_values(instrument_id: impl Into<String>, prices: &[f64], volumes: &[f64]) -> Self {
        const DAY_MS: i64 = 86_400_000;
        let prices = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| PricePoint::new(i as i64 * DAY_MS, p))
            .collect::<Vec<_>>();
        let volumes = volumes
            .iter()
            .enumerate()
            .map(|(i, &v)| VolumePoint::new(i as i64 * DAY_MS, v))
            .collect();
        let window_days = prices.len() as u32;
        Self::new(instrument_id, window_days, prices, volumes)
    }

    /// Granularity the provider was asked for.
    pub fn granularity(&self) -> Granularity {
        Granularity::for_window(self.window_days)
    }

    /// Get the number of price points.
    #[inline]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Check if the series has no prices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn prices(&self) -> &[PricePoint] {
        &self.prices
    }

    pub fn volumes(&self) -> &[VolumePoint] {
        &self.volumes
    }

    /// Extract prices as a vector, oldest first.
    pub fn price_values(&self) -> Vec<f64> {
        self.prices.iter().map(|p| p.price).collect()
    }

    /// Extract volumes as a vector, oldest first.
    pub fn volume_values(&self) -> Vec<f64> {
        self.volumes.iter().map(|v| v.volume).collect()
    }

    /// Most recent price.
    pub fn last_price(&self) -> Option<f64> {
        self.prices.last().map(|p| p.price)
    }

    /// Check the ordering invariant and that the series is usable.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.prices.is_empty() {
            return Err(DataError::InvalidSeries(format!(
                "{} has no price points",
                self.instrument_id
            )));
        }
        let ascending = self
            .prices
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp)
            && self
                .volumes
                .windows(2)
                .all(|w| w[0].timestamp <= w[1].timestamp);
        if !ascending {
            return Err(DataError::InvalidSeries(format!(
                "{} is not ordered by timestamp",
                self.instrument_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_sorts_input() {
        let series = Series::new(
            "bitcoin",
            7,
            vec![
                PricePoint::new(3, 103.0),
                PricePoint::new(1, 101.0),
                PricePoint::new(2, 102.0),
            ],
            vec![VolumePoint::new(2, 20.0), VolumePoint::new(1, 10.0)],
        );

        assert_eq!(series.price_values(), vec![101.0, 102.0, 103.0]);
        assert_eq!(series.volume_values(), vec![10.0, 20.0]);
        assert_eq!(series.last_price(), Some(103.0));
        assert!(series.validate().is_ok());
    }

    #[test]
    fn test_empty_series_is_invalid() {
        let series = Series::new("bitcoin", 7, vec![], vec![]);
        assert!(series.is_empty());
        assert!(matches!(series.validate(), Err(DataError::InvalidSeries(_))));
    }

    #[test]
    fn test_from_values() {
        let series = Series::from_values("eth", &[1.0, 2.0, 3.0], &[10.0, 20.0]);

        assert_eq!(series.len(), 3);
        assert_eq!(series.volumes().len(), 2);
        assert_eq!(series.prices()[1].timestamp, 86_400_000);
        assert_eq!(series.window_days, 3);
        assert_eq!(series.granularity(), Granularity::Daily);
    }

    #[test]
    fn test_series_serializes_camel_case() {
        let series = Series::from_values("eth", &[1.0], &[]);
        let json = serde_json::to_value(&series).unwrap();

        assert_eq!(json["instrumentId"], "eth");
        assert_eq!(json["windowDays"], 1);
        assert_eq!(json["prices"][0]["price"], 1.0);
    }

    #[test]
    fn test_deserialize_restores_order() {
        let json = r#"{
            "instrumentId": "eth",
            "windowDays": 3,
            "prices": [
                {"timestamp": 3, "price": 3.0},
                {"timestamp": 1, "price": 1.0},
                {"timestamp": 2, "price": 2.0}
            ],
            "volumes": [{"timestamp": 2, "volume": 20.0}, {"timestamp": 1, "volume": 10.0}]
        }"#;

        let series: Series = serde_json::from_str(json).unwrap();
        assert_eq!(series.price_values(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.volume_values(), vec![10.0, 20.0]);
        assert_eq!(series.last_price(), Some(3.0));
    }
}
