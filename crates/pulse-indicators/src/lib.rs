//! Technical indicators.
//!
//! This crate provides the numeric core used by the analysis engine:
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (RSI, MACD)
//! - Volatility indicators (Standard Deviation, Bollinger Bands)
//! - Volume ratio
//!
//! Everything here is a pure function of its input slice. Classification
//! into buy/sell verdicts lives in `pulse-analysis`.

pub mod momentum;
pub mod moving_average;
pub mod volatility;
pub mod volume;

pub use momentum::{Macd, MacdOutput, Rsi};
pub use moving_average::{Ema, Sma};
pub use volatility::{BollingerBands, BollingerOutput, StdDev};
pub use volume::{VolumeRatio, VolumeRatioOutput};
