//! Classified indicator readings.
//!
//! Each reading carries the latest numeric values, a verdict and a short
//! human-readable description. Readings built from too little data carry
//! `IndicatorSignal::Neutral` and zeroed values instead of an error.

use pulse_core::error::IndicatorError;
use pulse_core::types::IndicatorSignal;
use serde::{Deserialize, Serialize};

/// Description used for every degraded reading.
pub(crate) fn insufficient(indicator: &str, err: &IndicatorError) -> String {
    match err {
        IndicatorError::InsufficientData {
            required,
            available,
        } => format!(
            "Insufficient data for {} calculation: need {} points, have {}",
            indicator, required, available
        ),
        other => format!("{} unavailable: {}", indicator, other),
    }
}

/// RSI reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsiReading {
    pub value: f64,
    pub signal: IndicatorSignal,
    pub description: String,
}

impl RsiReading {
    /// RSI value reported when it cannot be computed.
    pub const NEUTRAL_VALUE: f64 = 50.0;

    pub fn insufficient(err: &IndicatorError) -> Self {
        Self {
            value: Self::NEUTRAL_VALUE,
            signal: IndicatorSignal::Neutral,
            description: insufficient("RSI", err),
        }
    }
}

/// MACD reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacdReading {
    pub macd_line: f64,
    pub signal_line: f64,
    pub histogram: f64,
    pub signal: IndicatorSignal,
    pub description: String,
}

impl MacdReading {
    pub fn insufficient(err: &IndicatorError) -> Self {
        Self {
            macd_line: 0.0,
            signal_line: 0.0,
            histogram: 0.0,
            signal: IndicatorSignal::Neutral,
            description: insufficient("MACD", err),
        }
    }
}

/// Bollinger Bands reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BollingerReading {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    /// Band width as a percentage of the middle band
    pub bandwidth: f64,
    pub signal: IndicatorSignal,
    pub description: String,
}

impl BollingerReading {
    pub fn insufficient(err: &IndicatorError) -> Self {
        Self {
            upper: 0.0,
            middle: 0.0,
            lower: 0.0,
            bandwidth: 0.0,
            signal: IndicatorSignal::Neutral,
            description: insufficient("Bollinger Bands", err),
        }
    }
}

/// Moving average trend reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReading {
    pub sma_short: f64,
    pub sma_medium: f64,
    pub sma_long: f64,
    pub current_price: f64,
    pub signal: IndicatorSignal,
    pub description: String,
}

impl TrendReading {
    pub fn insufficient(err: &IndicatorError) -> Self {
        Self {
            sma_short: 0.0,
            sma_medium: 0.0,
            sma_long: 0.0,
            current_price: 0.0,
            signal: IndicatorSignal::Neutral,
            description: insufficient("moving average", err),
        }
    }
}

/// Volume ratio reading. Informational only, never part of the vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeReading {
    pub current: f64,
    pub average: f64,
    pub ratio: f64,
    pub signal: IndicatorSignal,
    pub description: String,
}

impl VolumeReading {
    pub fn insufficient(err: &IndicatorError) -> Self {
        Self {
            current: 0.0,
            average: 0.0,
            ratio: 0.0,
            signal: IndicatorSignal::Neutral,
            description: insufficient("volume", err),
        }
    }
}

/// All five readings for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicators {
    pub rsi: RsiReading,
    pub macd: MacdReading,
    pub bollinger_bands: BollingerReading,
    pub moving_averages: TrendReading,
    pub volume: VolumeReading,
}

impl Indicators {
    /// Verdicts of the four directional indicators, in voting order.
    pub fn votes(&self) -> [IndicatorSignal; 4] {
        [
            self.rsi.signal,
            self.macd.signal,
            self.bollinger_bands.signal,
            self.moving_averages.signal,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_description() {
        let err = IndicatorError::InsufficientData {
            required: 15,
            available: 3,
        };
        let reading = RsiReading::insufficient(&err);

        assert_eq!(reading.value, 50.0);
        assert_eq!(reading.signal, IndicatorSignal::Neutral);
        assert_eq!(
            reading.description,
            "Insufficient data for RSI calculation: need 15 points, have 3"
        );
    }

    #[test]
    fn test_readings_serialize_camel_case() {
        let err = IndicatorError::InsufficientData {
            required: 200,
            available: 30,
        };
        let json = serde_json::to_value(TrendReading::insufficient(&err)).unwrap();

        assert_eq!(json["smaLong"], 0.0);
        assert_eq!(json["currentPrice"], 0.0);
        assert_eq!(json["signal"], "NEUTRAL");
    }
}
