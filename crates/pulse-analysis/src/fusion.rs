//! Signal fusion: one overall call from the four directional verdicts.

use pulse_core::types::{IndicatorSignal, OverallSignalKind};
use serde::{Deserialize, Serialize};

/// Number of indicators that take part in the vote.
pub const VOTERS: usize = 4;

/// Vote counts. Anything that is not BUY or SELL counts as hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteBreakdown {
    pub buy: usize,
    pub sell: usize,
    pub hold: usize,
}

impl VoteBreakdown {
    pub fn count(votes: &[IndicatorSignal; VOTERS]) -> Self {
        let buy = votes.iter().filter(|s| **s == IndicatorSignal::Buy).count();
        let sell = votes.iter().filter(|s| **s == IndicatorSignal::Sell).count();
        Self {
            buy,
            sell,
            hold: VOTERS - buy - sell,
        }
    }
}

/// Fused recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallSignal {
    pub signal: OverallSignalKind,
    /// Confidence in percent (0..=100)
    pub confidence: f64,
    pub recommendation: String,
    pub breakdown: VoteBreakdown,
}

/// Fuse RSI, MACD, Bollinger and trend verdicts (in that order).
///
/// Branches are checked in priority order: strong buy, buy, strong sell,
/// sell, hold. Only the strong branches scale confidence with the vote.
pub fn fuse(votes: [IndicatorSignal; VOTERS]) -> OverallSignal {
    let breakdown = VoteBreakdown::count(&votes);
    let share = |n: usize| n as f64 / VOTERS as f64 * 100.0;

    let (signal, confidence, recommendation) = if breakdown.buy >= 3 {
        (
            OverallSignalKind::StrongBuy,
            share(breakdown.buy),
            "Multiple indicators suggest this is a good buying opportunity. Consider entering a position.",
        )
    } else if breakdown.buy >= 2 {
        (
            OverallSignalKind::Buy,
            60.0,
            "Some indicators suggest buying. Consider a smaller position or wait for more confirmation.",
        )
    } else if breakdown.sell >= 3 {
        (
            OverallSignalKind::StrongSell,
            share(breakdown.sell),
            "Multiple indicators suggest selling or avoiding this asset. Consider exiting positions.",
        )
    } else if breakdown.sell >= 2 {
        (
            OverallSignalKind::Sell,
            60.0,
            "Some indicators suggest selling. Consider reducing position size or setting stop losses.",
        )
    } else {
        (
            OverallSignalKind::Hold,
            50.0,
            "Mixed signals from indicators. Best to hold current positions and wait for clearer signals.",
        )
    };

    OverallSignal {
        signal,
        confidence,
        recommendation: recommendation.to_string(),
        breakdown,
    }
}
