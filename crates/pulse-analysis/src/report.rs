//! Analysis report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fusion::OverallSignal;
use crate::readings::Indicators;

/// Result of analyzing one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub instrument_id: String,
    pub indicators: Indicators,
    pub overall: OverallSignal,
    pub generated_at: DateTime<Utc>,
}

impl AnalysisReport {
    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();
        let ind = &self.indicators;

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str(&format!(
            "  TECHNICAL ANALYSIS: {}\n",
            self.instrument_id.to_uppercase()
        ));
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str("OVERALL\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Signal:              {}\n", self.overall.signal));
        s.push_str(&format!(
            "  Confidence:          {:.0}%\n",
            self.overall.confidence
        ));
        s.push_str(&format!(
            "  Votes:               {} buy / {} sell / {} hold\n",
            self.overall.breakdown.buy, self.overall.breakdown.sell, self.overall.breakdown.hold
        ));
        s.push_str(&format!("  {}\n", self.overall.recommendation));
        s.push('\n');

        s.push_str("INDICATORS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!(
            "  RSI:                 {:<8} {:.2}\n",
            ind.rsi.signal.as_str(),
            ind.rsi.value
        ));
        s.push_str(&format!("    {}\n", ind.rsi.description));
        s.push_str(&format!(
            "  MACD:                {:<8} line {:.4} / signal {:.4} / hist {:.4}\n",
            ind.macd.signal.as_str(),
            ind.macd.macd_line,
            ind.macd.signal_line,
            ind.macd.histogram
        ));
        s.push_str(&format!("    {}\n", ind.macd.description));
        s.push_str(&format!(
            "  Bollinger Bands:     {:<8} {:.2} / {:.2} / {:.2}\n",
            ind.bollinger_bands.signal.as_str(),
            ind.bollinger_bands.lower,
            ind.bollinger_bands.middle,
            ind.bollinger_bands.upper
        ));
        s.push_str(&format!("    {}\n", ind.bollinger_bands.description));
        s.push_str(&format!(
            "  Moving Averages:     {:<8} {:.2} / {:.2} / {:.2}\n",
            ind.moving_averages.signal.as_str(),
            ind.moving_averages.sma_short,
            ind.moving_averages.sma_medium,
            ind.moving_averages.sma_long
        ));
        s.push_str(&format!("    {}\n", ind.moving_averages.description));
        s.push_str(&format!(
            "  Volume:              {:<8} ratio {:.2}\n",
            ind.volume.signal.as_str(),
            ind.volume.ratio
        ));
        s.push_str(&format!("    {}\n", ind.volume.description));
        s.push('\n');

        s.push_str(&format!(
            "Generated at {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
