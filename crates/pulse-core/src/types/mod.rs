//! Core data types.

mod granularity;
mod instrument;
mod market;
mod series;
mod signal;

pub use granularity::Granularity;
pub use instrument::{Instrument, Universe};
pub use market::{
    AssetDetail, CoinMatch, FundingRate, FuturesMetrics, LongShortRatio, OpenInterest,
    PriceSnapshot,
};
pub use series::{PricePoint, Series, VolumePoint};
pub use signal::{IndicatorSignal, OverallSignalKind};
