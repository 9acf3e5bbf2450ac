//! CSV series source.
//!
//! Loads a price/volume history from disk so analysis can run without the
//! network.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::ReaderBuilder;
use pulse_core::error::DataError;
use pulse_core::types::{PricePoint, Series, VolumePoint};
use serde::Deserialize;

const DAY_MS: i64 = 86_400_000;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Price", alias = "Close", alias = "close")]
    price: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: Option<f64>,
}

/// CSV file holding one instrument's history.
#[derive(Debug, Clone)]
pub struct CsvSeriesSource {
    path: PathBuf,
}

impl CsvSeriesSource {
    /// Create a source for an existing file.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::NoDataAvailable);
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file as an ascending series for `instrument_id`.
    ///
    /// Rows without a volume contribute a price point only.
    pub fn load(&self, instrument_id: &str) -> Result<Series, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut prices = Vec::new();
        let mut volumes = Vec::new();

        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
            let timestamp = parse_timestamp(&record.date)?;

            if !record.price.is_finite() {
                return Err(DataError::ParseError(format!(
                    "Non-finite price at {}",
                    record.date
                )));
            }
            prices.push(PricePoint::new(timestamp, record.price));
            if let Some(volume) = record.volume {
                if !volume.is_finite() {
                    return Err(DataError::ParseError(format!(
                        "Non-finite volume at {}",
                        record.date
                    )));
                }
                volumes.push(VolumePoint::new(timestamp, volume));
            }
        }

        if prices.is_empty() {
            return Err(DataError::NoDataAvailable);
        }

        let window_days = window_days(&prices);
        let series = Series::new(instrument_id, window_days, prices, volumes);
        series.validate()?;
        Ok(series)
    }
}

/// Span of the points in whole days, at least one.
fn window_days(prices: &[PricePoint]) -> u32 {
    let (min, max) = prices
        .iter()
        .fold((i64::MAX, i64::MIN), |(lo, hi), p| {
            (lo.min(p.timestamp), hi.max(p.timestamp))
        });
    let days = max.saturating_sub(min).saturating_add(DAY_MS - 1) / DAY_MS;
    days.clamp(1, u32::MAX as i64) as u32
}

/// Parse various timestamp formats into Unix milliseconds.
fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    let formats = [
        "%Y-%m-%d",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%d-%m-%Y",
    ];

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d.and_time(NaiveTime::MIN).and_utc().timestamp_millis());
        }
    }

    // Unix timestamp; assume milliseconds if > 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        if ts > 10_000_000_000 {
            return Ok(ts);
        }
        return ts.checked_mul(1000).ok_or_else(|| {
            DataError::ParseError(format!("Timestamp out of range: {}", date_str))
        });
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_timestamp() {
        assert!(parse_timestamp("2024-01-15").is_ok());
        assert!(parse_timestamp("2024-01-15 10:30:00").is_ok());
        assert_eq!(parse_timestamp("1705312800000").unwrap(), 1_705_312_800_000);
        assert_eq!(parse_timestamp("1705312800").unwrap(), 1_705_312_800_000);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_out_of_range_timestamp_is_parse_error() {
        assert!(matches!(
            parse_timestamp("-9300000000000000"),
            Err(DataError::ParseError(_))
        ));
    }

    #[test]
    fn test_window_days_spans_extreme_timestamps() {
        let prices = [
            PricePoint::new(i64::MIN, 1.0),
            PricePoint::new(i64::MAX, 2.0),
        ];
        assert_eq!(window_days(&prices), u32::MAX);
        assert_eq!(window_days(&prices[..1]), 1);
    }

    #[test]
    fn test_non_finite_volume_is_parse_error() {
        let file = write_csv("date,close,volume\n2024-01-01,101.0,10\n2024-01-02,102.0,NaN\n");
        let result = CsvSeriesSource::new(file.path()).unwrap().load("bitcoin");
        assert!(matches!(result, Err(DataError::ParseError(_))));

        let file = write_csv("date,close,volume\n2024-01-01,101.0,inf\n");
        let result = CsvSeriesSource::new(file.path()).unwrap().load("bitcoin");
        assert!(matches!(result, Err(DataError::ParseError(_))));
    }

    #[test]
    fn test_load_sorts_rows() {
        let file = write_csv(
            "date,close,volume\n\
             2024-01-03,103.0,30\n\
             2024-01-01,101.0,10\n\
             2024-01-02,102.0,20\n",
        );

        let series = CsvSeriesSource::new(file.path())
            .unwrap()
            .load("bitcoin")
            .unwrap();

        assert_eq!(series.instrument_id, "bitcoin");
        assert_eq!(series.price_values(), vec![101.0, 102.0, 103.0]);
        assert_eq!(series.volume_values(), vec![10.0, 20.0, 30.0]);
        assert_eq!(series.window_days, 2);
    }

    #[test]
    fn test_load_without_volume_column() {
        let file = write_csv("timestamp,price\n1705312800000,1.5\n1705399200000,1.6\n");

        let series = CsvSeriesSource::new(file.path())
            .unwrap()
            .load("cardano")
            .unwrap();

        assert_eq!(series.len(), 2);
        assert!(series.volumes().is_empty());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            CsvSeriesSource::new("/definitely/not/here.csv"),
            Err(DataError::NoDataAvailable)
        ));
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let file = write_csv("date,close,volume\n");
        let result = CsvSeriesSource::new(file.path()).unwrap().load("bitcoin");
        assert!(matches!(result, Err(DataError::NoDataAvailable)));
    }

    #[test]
    fn test_bad_price_is_parse_error() {
        let file = write_csv("date,close\n2024-01-01,abc\n");
        let result = CsvSeriesSource::new(file.path()).unwrap().load("bitcoin");
        assert!(matches!(result, Err(DataError::ParseError(_))));
    }
}
