//! Indicator thresholds and periods.

use pulse_core::error::IndicatorError;
use serde::{Deserialize, Serialize};

/// Every tunable the indicator engine reads, in one immutable structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnalysisSettings {
    #[serde(default)]
    pub rsi: RsiSettings,
    #[serde(default)]
    pub macd: MacdSettings,
    #[serde(default)]
    pub bollinger: BollingerSettings,
    #[serde(default)]
    pub moving_averages: TrendSettings,
    #[serde(default)]
    pub volume: VolumeSettings,
}

/// RSI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiSettings {
    /// RSI calculation period
    pub period: usize,
    /// SELL at or above this
    pub overbought: f64,
    /// BUY at or below this
    pub oversold: f64,
}

impl Default for RsiSettings {
    fn default() -> Self {
        Self {
            period: 14,
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

/// MACD settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdSettings {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdSettings {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

/// Bollinger Bands settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerSettings {
    pub period: usize,
    /// Band distance in standard deviations
    pub std_devs: f64,
    /// Bandwidth (percent) above which the HOLD note reports high volatility
    pub high_volatility_bandwidth: f64,
}

impl Default for BollingerSettings {
    fn default() -> Self {
        Self {
            period: 20,
            std_devs: 2.0,
            high_volatility_bandwidth: 10.0,
        }
    }
}

/// Moving average trend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSettings {
    pub short: usize,
    pub medium: usize,
    pub long: usize,
}

impl Default for TrendSettings {
    fn default() -> Self {
        Self {
            short: 20,
            medium: 50,
            long: 200,
        }
    }
}

/// Volume ratio settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSettings {
    /// Trailing window length
    pub window: usize,
    /// STRONG above this ratio
    pub strong_ratio: f64,
    /// WEAK below this ratio
    pub weak_ratio: f64,
}

impl Default for VolumeSettings {
    fn default() -> Self {
        Self {
            window: 7,
            strong_ratio: 1.5,
            weak_ratio: 0.5,
        }
    }
}

fn invalid(msg: impl Into<String>) -> IndicatorError {
    IndicatorError::InvalidParameter(msg.into())
}

impl AnalysisSettings {
    /// Reject settings the indicators cannot be built from.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        let rsi = &self.rsi;
        if rsi.period < 2 {
            return Err(invalid("RSI period must be at least 2"));
        }
        if rsi.overbought <= rsi.oversold {
            return Err(invalid("RSI overbought must be greater than oversold"));
        }
        if rsi.overbought > 100.0 || rsi.oversold < 0.0 {
            return Err(invalid("RSI thresholds must be between 0 and 100"));
        }

        let macd = &self.macd;
        if macd.fast == 0 || macd.slow == 0 || macd.signal == 0 {
            return Err(invalid("MACD periods must be greater than 0"));
        }
        if macd.fast >= macd.slow {
            return Err(invalid("MACD fast period must be less than slow period"));
        }

        let bb = &self.bollinger;
        if bb.period < 2 {
            return Err(invalid("Bollinger period must be at least 2"));
        }
        if bb.std_devs <= 0.0 {
            return Err(invalid("Bollinger std_devs must be positive"));
        }

        let ma = &self.moving_averages;
        if ma.short == 0 || !(ma.short < ma.medium && ma.medium < ma.long) {
            return Err(invalid(
                "Moving average periods must satisfy 0 < short < medium < long",
            ));
        }

        let vol = &self.volume;
        if vol.window == 0 {
            return Err(invalid("Volume window must be greater than 0"));
        }
        if vol.weak_ratio >= vol.strong_ratio {
            return Err(invalid("Volume weak_ratio must be below strong_ratio"));
        }

        Ok(())
    }
}
