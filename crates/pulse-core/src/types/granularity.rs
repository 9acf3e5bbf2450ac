//! Sampling granularity for historical series.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Spacing between points the provider is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Hourly points
    Hourly,
    /// Daily points
    #[default]
    Daily,
}

impl Granularity {
    /// Windows of a day or less are sampled hourly, everything longer daily.
    pub fn for_window(window_days: u32) -> Self {
        if window_days <= 1 {
            Granularity::Hourly
        } else {
            Granularity::Daily
        }
    }

    /// Spacing between points in seconds.
    pub fn as_secs(&self) -> u64 {
        match self {
            Granularity::Hourly => 3600,
            Granularity::Daily => 86400,
        }
    }

    /// Value of the provider's `interval` request parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            Granularity::Hourly => "hourly",
            Granularity::Daily => "daily",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_param())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1h" | "hour" | "hourly" => Ok(Granularity::Hourly),
            "1d" | "day" | "daily" => Ok(Granularity::Daily),
            _ => Err(format!("Invalid granularity: {}", s)),
        }
    }
}
