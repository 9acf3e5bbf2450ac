//! Core traits.

mod indicator;
mod provider;

pub use indicator::{Indicator, MultiOutputIndicator};
pub use provider::{DerivativesProvider, MarketDataProvider};
