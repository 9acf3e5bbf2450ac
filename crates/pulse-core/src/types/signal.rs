//! Indicator and overall signal classifications.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict of a single indicator.
///
/// Directional indicators use `Buy`/`Sell`/`Hold`; volume uses
/// `Strong`/`Weak`/`Normal`; `Neutral` marks an indicator that could not be
/// computed from the available data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorSignal {
    Buy,
    Sell,
    Hold,
    Neutral,
    Strong,
    Weak,
    Normal,
}

impl IndicatorSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorSignal::Buy => "BUY",
            IndicatorSignal::Sell => "SELL",
            IndicatorSignal::Hold => "HOLD",
            IndicatorSignal::Neutral => "NEUTRAL",
            IndicatorSignal::Strong => "STRONG",
            IndicatorSignal::Weak => "WEAK",
            IndicatorSignal::Normal => "NORMAL",
        }
    }
}

impl fmt::Display for IndicatorSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fused recommendation across the directional indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverallSignalKind {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl OverallSignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallSignalKind::StrongBuy => "STRONG_BUY",
            OverallSignalKind::Buy => "BUY",
            OverallSignalKind::Hold => "HOLD",
            OverallSignalKind::Sell => "SELL",
            OverallSignalKind::StrongSell => "STRONG_SELL",
        }
    }

    pub fn is_bullish(&self) -> bool {
        matches!(self, OverallSignalKind::StrongBuy | OverallSignalKind::Buy)
    }

    pub fn is_bearish(&self) -> bool {
        matches!(self, OverallSignalKind::StrongSell | OverallSignalKind::Sell)
    }
}

impl fmt::Display for OverallSignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_wire_names() {
        assert_eq!(
            serde_json::to_string(&IndicatorSignal::Neutral).unwrap(),
            "\"NEUTRAL\""
        );
        assert_eq!(
            serde_json::to_string(&OverallSignalKind::StrongSell).unwrap(),
            "\"STRONG_SELL\""
        );
        assert_eq!(OverallSignalKind::StrongBuy.to_string(), "STRONG_BUY");
    }

    #[test]
    fn test_direction() {
        assert!(OverallSignalKind::Buy.is_bullish());
        assert!(OverallSignalKind::StrongSell.is_bearish());
        assert!(!OverallSignalKind::Hold.is_bullish());
        assert!(!OverallSignalKind::Hold.is_bearish());
    }
}
