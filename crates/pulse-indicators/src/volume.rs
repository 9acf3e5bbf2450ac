//! Volume indicators.

use pulse_core::traits::MultiOutputIndicator;
use serde::{Deserialize, Serialize};

/// Volume ratio output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeRatioOutput {
    /// Volume of the newest point in the window
    pub current: f64,
    /// Mean volume over the window, newest point included
    pub average: f64,
    /// current / average, or 0 when the average is 0
    pub ratio: f64,
}

/// Relative volume.
///
/// Compares the latest volume to the mean of the trailing window it closes.
#[derive(Debug, Clone)]
pub struct VolumeRatio {
    period: usize,
}

impl VolumeRatio {
    /// Create a new volume ratio over `period` points (7 by default).
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Default for VolumeRatio {
    fn default() -> Self {
        Self::new(7)
    }
}

impl MultiOutputIndicator for VolumeRatio {
    type Outputs = VolumeRatioOutput;

    fn calculate(&self, data: &[f64]) -> Vec<VolumeRatioOutput> {
        let period_f64 = self.period as f64;
        data.windows(self.period)
            .map(|window| {
                let current = window[window.len() - 1];
                let average = window.iter().sum::<f64>() / period_f64;
                let ratio = if average != 0.0 { current / average } else { 0.0 };
                VolumeRatioOutput {
                    current,
                    average,
                    ratio,
                }
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "Volume Ratio"
    }
}
