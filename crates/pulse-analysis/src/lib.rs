//! Technical analysis for market-pulse.
//!
//! This crate classifies indicator values and fuses them into one call:
//! - RSI overbought/oversold
//! - MACD momentum
//! - Bollinger Bands position
//! - Moving average trend (golden/death cross)
//! - Volume ratio (informational, not voted)

mod engine;
mod fusion;
mod readings;
mod report;
mod settings;

pub use engine::IndicatorEngine;
pub use fusion::{fuse, OverallSignal, VoteBreakdown, VOTERS};
pub use readings::{
    BollingerReading, Indicators, MacdReading, RsiReading, TrendReading, VolumeReading,
};
pub use report::AnalysisReport;
pub use settings::{
    AnalysisSettings, BollingerSettings, MacdSettings, RsiSettings, TrendSettings, VolumeSettings,
};
