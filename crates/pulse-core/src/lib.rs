//! Core types and traits for market-pulse.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Instrument, Series, PriceSnapshot, FuturesMetrics)
//! - Indicator and overall signal classifications
//! - Core traits for indicators and market data providers
//! - Error types shared by every layer

pub mod types;
pub mod traits;
pub mod error;

pub use error::{PulseError, PulseResult};
pub use types::*;
pub use traits::*;
