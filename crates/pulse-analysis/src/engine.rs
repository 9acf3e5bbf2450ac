//! Indicator engine.
//!
//! Turns a price/volume series into the five classified readings and fuses
//! the directional ones into an overall signal. Holds no mutable state: the
//! same series always yields the same readings.

use chrono::{DateTime, Utc};
use pulse_core::{
    error::IndicatorError,
    traits::{Indicator, MultiOutputIndicator},
    types::{IndicatorSignal, Series},
};
use pulse_indicators::{BollingerBands, Macd, Rsi, Sma, VolumeRatio};
use tracing::debug;

use crate::fusion::fuse;
use crate::readings::{
    BollingerReading, Indicators, MacdReading, RsiReading, TrendReading, VolumeReading,
};
use crate::report::AnalysisReport;
use crate::settings::AnalysisSettings;

/// Latest value of a single-output indicator, or why there is none.
fn latest_single<I: Indicator>(indicator: &I, data: &[f64]) -> Result<I::Output, IndicatorError> {
    indicator.validate_data(data)?;
    indicator
        .latest(data)
        .ok_or(IndicatorError::InsufficientData {
            required: indicator.period(),
            available: data.len(),
        })
}

/// Latest output of a multi-output indicator, or why there is none.
fn latest_multi<I: MultiOutputIndicator>(
    indicator: &I,
    data: &[f64],
) -> Result<I::Outputs, IndicatorError> {
    indicator.validate_data(data)?;
    indicator
        .latest(data)
        .ok_or(IndicatorError::InsufficientData {
            required: indicator.period(),
            available: data.len(),
        })
}

/// Indicator engine configured from one immutable settings value.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    settings: AnalysisSettings,
    rsi: Rsi,
    macd: Macd,
    bollinger: BollingerBands,
    sma_short: Sma,
    sma_medium: Sma,
    sma_long: Sma,
    volume: VolumeRatio,
}

impl IndicatorEngine {
    /// Build an engine, rejecting settings the indicators cannot use.
    pub fn new(settings: AnalysisSettings) -> Result<Self, IndicatorError> {
        settings.validate()?;

        Ok(Self {
            rsi: Rsi::new(settings.rsi.period),
            macd: Macd::with_periods(settings.macd.fast, settings.macd.slow, settings.macd.signal),
            bollinger: BollingerBands::with_params(
                settings.bollinger.period,
                settings.bollinger.std_devs,
            ),
            sma_short: Sma::new(settings.moving_averages.short),
            sma_medium: Sma::new(settings.moving_averages.medium),
            sma_long: Sma::new(settings.moving_averages.long),
            volume: VolumeRatio::new(settings.volume.window),
            settings,
        })
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Classify the latest RSI.
    pub fn rsi(&self, prices: &[f64]) -> RsiReading {
        let value = match latest_single(&self.rsi, prices) {
            Ok(v) => v,
            Err(err) => return RsiReading::insufficient(&err),
        };

        let cfg = &self.settings.rsi;
        let (signal, description) = if value >= cfg.overbought {
            (
                IndicatorSignal::Sell,
                format!(
                    "RSI is {:.2} (overbought). Price may be due for a correction.",
                    value
                ),
            )
        } else if value <= cfg.oversold {
            (
                IndicatorSignal::Buy,
                format!(
                    "RSI is {:.2} (oversold). Price may be due for a rebound.",
                    value
                ),
            )
        } else {
            (
                IndicatorSignal::Hold,
                format!("RSI is {:.2} (neutral). No strong signal.", value),
            )
        };

        RsiReading {
            value,
            signal,
            description,
        }
    }

    /// Classify the latest MACD line against its signal line.
    pub fn macd(&self, prices: &[f64]) -> MacdReading {
        let out = match latest_multi(&self.macd, prices) {
            Ok(out) => out,
            Err(err) => return MacdReading::insufficient(&err),
        };

        let (signal, description) = if out.macd > out.signal && out.histogram > 0.0 {
            (
                IndicatorSignal::Buy,
                "MACD line is above signal line (bullish momentum).",
            )
        } else if out.macd < out.signal && out.histogram < 0.0 {
            (
                IndicatorSignal::Sell,
                "MACD line is below signal line (bearish momentum).",
            )
        } else {
            (IndicatorSignal::Hold, "MACD shows neutral momentum.")
        };

        MacdReading {
            macd_line: out.macd,
            signal_line: out.signal,
            histogram: out.histogram,
            signal,
            description: description.to_string(),
        }
    }

    /// Classify the last price against the Bollinger Bands.
    pub fn bollinger_bands(&self, prices: &[f64]) -> BollingerReading {
        let bands = match latest_multi(&self.bollinger, prices) {
            Ok(out) => out,
            Err(err) => return BollingerReading::insufficient(&err),
        };
        // validate_data guarantees at least one price
        let price = prices[prices.len() - 1];

        let (signal, description) = if bands.is_overbought(price) {
            (
                IndicatorSignal::Sell,
                format!(
                    "Price ({:.2}) is at or above upper band (overbought).",
                    price
                ),
            )
        } else if bands.is_oversold(price) {
            (
                IndicatorSignal::Buy,
                format!("Price ({:.2}) is at or below lower band (oversold).", price),
            )
        } else {
            let volatility = if bands.bandwidth > self.settings.bollinger.high_volatility_bandwidth
            {
                "high volatility"
            } else {
                "low volatility"
            };
            (
                IndicatorSignal::Hold,
                format!(
                    "Price is within bands. Bandwidth: {:.2}% ({}).",
                    bands.bandwidth, volatility
                ),
            )
        };

        BollingerReading {
            upper: bands.upper,
            middle: bands.middle,
            lower: bands.lower,
            bandwidth: bands.bandwidth,
            signal,
            description,
        }
    }

    /// Classify the ordering of the short, medium and long SMAs.
    pub fn moving_averages(&self, prices: &[f64]) -> TrendReading {
        let sma_long = match latest_single(&self.sma_long, prices) {
            Ok(v) => v,
            Err(err) => return TrendReading::insufficient(&err),
        };
        // The long window is the widest, so the shorter ones are available too
        let (sma_short, sma_medium) = match (
            latest_single(&self.sma_short, prices),
            latest_single(&self.sma_medium, prices),
        ) {
            (Ok(s), Ok(m)) => (s, m),
            (Err(err), _) | (_, Err(err)) => return TrendReading::insufficient(&err),
        };
        let current_price = prices[prices.len() - 1];
        let periods = &self.settings.moving_averages;

        let (signal, description) = if sma_short > sma_medium && sma_medium > sma_long {
            (
                IndicatorSignal::Buy,
                "Strong uptrend: All moving averages aligned bullishly (Golden Cross pattern)."
                    .to_string(),
            )
        } else if sma_short < sma_medium && sma_medium < sma_long {
            (
                IndicatorSignal::Sell,
                "Strong downtrend: All moving averages aligned bearishly (Death Cross pattern)."
                    .to_string(),
            )
        } else if current_price > sma_long {
            (
                IndicatorSignal::Hold,
                format!(
                    "Price above {}-period MA (long-term uptrend), but mixed signals on shorter timeframes.",
                    periods.long
                ),
            )
        } else {
            (
                IndicatorSignal::Hold,
                "Mixed signals from moving averages. No clear trend.".to_string(),
            )
        };

        TrendReading {
            sma_short,
            sma_medium,
            sma_long,
            current_price,
            signal,
            description,
        }
    }

    /// Classify the latest volume against its trailing average.
    pub fn volume(&self, volumes: &[f64]) -> VolumeReading {
        let out = match latest_multi(&self.volume, volumes) {
            Ok(out) => out,
            Err(err) => return VolumeReading::insufficient(&err),
        };

        let cfg = &self.settings.volume;
        let pct = out.ratio * 100.0;
        let (signal, description) = if out.ratio > cfg.strong_ratio {
            (
                IndicatorSignal::Strong,
                format!(
                    "High volume ({:.0}% of average). Strong market interest.",
                    pct
                ),
            )
        } else if out.ratio < cfg.weak_ratio {
            (
                IndicatorSignal::Weak,
                format!("Low volume ({:.0}% of average). Weak market interest.", pct),
            )
        } else {
            (
                IndicatorSignal::Normal,
                format!("Normal volume levels ({:.0}% of average).", pct),
            )
        };

        VolumeReading {
            current: out.current,
            average: out.average,
            ratio: out.ratio,
            signal,
            description,
        }
    }

    /// Compute all five readings for raw price and volume values.
    pub fn indicators(&self, prices: &[f64], volumes: &[f64]) -> Indicators {
        Indicators {
            rsi: self.rsi(prices),
            macd: self.macd(prices),
            bollinger_bands: self.bollinger_bands(prices),
            moving_averages: self.moving_averages(prices),
            volume: self.volume(volumes),
        }
    }

    /// Analyze a series, stamping the report with the current time.
    pub fn analyze(&self, series: &Series) -> AnalysisReport {
        self.analyze_at(series, Utc::now())
    }

    /// Analyze a series with an explicit report timestamp.
    pub fn analyze_at(&self, series: &Series, generated_at: DateTime<Utc>) -> AnalysisReport {
        let indicators = self.indicators(&series.price_values(), &series.volume_values());
        let overall = fuse(indicators.votes());

        debug!(
            instrument = %series.instrument_id,
            points = series.len(),
            signal = %overall.signal,
            confidence = overall.confidence,
            "Analysis complete"
        );

        AnalysisReport {
            instrument_id: series.instrument_id.clone(),
            indicators,
            overall,
            generated_at,
        }
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        let settings = AnalysisSettings::default();
        Self {
            rsi: Rsi::default(),
            macd: Macd::default(),
            bollinger: BollingerBands::default(),
            sma_short: Sma::new(settings.moving_averages.short),
            sma_medium: Sma::new(settings.moving_averages.medium),
            sma_long: Sma::new(settings.moving_averages.long),
            volume: VolumeRatio::default(),
            settings,
        }
    }
}
