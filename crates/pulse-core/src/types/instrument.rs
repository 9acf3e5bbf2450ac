//! Tracked instruments.

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Identity of one tracked asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument {
    /// Provider-side id (e.g. `bitcoin`)
    #[serde(rename = "id")]
    pub provider_id: String,
    /// Ticker symbol (e.g. `BTC`)
    pub symbol: String,
    /// Human readable name
    #[serde(rename = "name")]
    pub display_name: String,
}

impl Instrument {
    pub fn new(provider_id: &str, symbol: &str, display_name: &str) -> Self {
        Self {
            provider_id: provider_id.to_string(),
            symbol: symbol.to_uppercase(),
            display_name: display_name.to_string(),
        }
    }

    /// Symbol of the USDT-margined perpetual contract.
    pub fn perpetual_symbol(&self) -> String {
        format!("{}USDT", self.symbol)
    }
}

/// The fixed set of instruments defined at startup.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    instruments: Vec<Instrument>,
}

impl Universe {
    pub fn new(instruments: Vec<Instrument>) -> Self {
        Self { instruments }
    }

    /// Find an instrument by provider id or by symbol (case-insensitive).
    pub fn resolve(&self, key: &str) -> Result<&Instrument, DataError> {
        let key = key.trim();
        self.instruments
            .iter()
            .find(|i| i.provider_id == key || i.symbol.eq_ignore_ascii_case(key))
            .ok_or_else(|| DataError::InstrumentNotFound(key.to_string()))
    }

    /// Provider ids in declaration order.
    pub fn ids(&self) -> Vec<&str> {
        self.instruments.iter().map(|i| i.provider_id.as_str()).collect()
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}
