//! Configuration structures.

use std::collections::HashSet;
use std::time::Duration;

use pulse_analysis::{
    AnalysisSettings, BollingerSettings, MacdSettings, RsiSettings, TrendSettings, VolumeSettings,
};
use pulse_core::error::{PulseError, PulseResult};
use pulse_core::types::{Instrument, Universe};
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default = "default_instruments")]
    pub instruments: Vec<Instrument>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings::default(),
            logging: LoggingConfig::default(),
            provider: ProviderConfig::default(),
            gateway: GatewayConfig::default(),
            cache: CacheConfig::default(),
            analysis: AnalysisConfig::default(),
            instruments: default_instruments(),
        }
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "market-pulse".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// pretty, compact or json
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Upstream provider endpoints and timeouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub coingecko_base_url: String,
    pub binance_futures_base_url: String,
    pub quote_currency: String,
    pub request_timeout_secs: u64,
    pub history_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            coingecko_base_url: "https://api.coingecko.com/api/v3".to_string(),
            binance_futures_base_url: "https://fapi.binance.com".to_string(),
            quote_currency: "usd".to_string(),
            request_timeout_secs: 10,
            history_timeout_secs: 15,
            user_agent: concat!("market-pulse/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ProviderConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn history_timeout(&self) -> Duration {
        Duration::from_secs(self.history_timeout_secs)
    }
}

/// Outbound call pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Minimum spacing between upstream calls
    pub min_delay_ms: u64,
    /// Deadline for one paced call
    pub call_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 500,
            call_timeout_secs: 15,
        }
    }
}

impl GatewayConfig {
    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

/// Cache TTLs in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub price_ttl_secs: u64,
    pub detail_ttl_secs: u64,
    pub history_ttl_secs: u64,
    pub futures_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            price_ttl_secs: 60,
            detail_ttl_secs: 60,
            history_ttl_secs: 7200,
            futures_ttl_secs: 300,
        }
    }
}

/// Analysis window and indicator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Days of history fetched for analysis
    pub window_days: u32,
    pub rsi: RsiSettings,
    pub macd: MacdSettings,
    pub bollinger: BollingerSettings,
    pub moving_averages: TrendSettings,
    pub volume: VolumeSettings,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            rsi: RsiSettings::default(),
            macd: MacdSettings::default(),
            bollinger: BollingerSettings::default(),
            moving_averages: TrendSettings::default(),
            volume: VolumeSettings::default(),
        }
    }
}

impl AnalysisConfig {
    /// Indicator settings for the engine.
    pub fn settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            rsi: self.rsi.clone(),
            macd: self.macd.clone(),
            bollinger: self.bollinger.clone(),
            moving_averages: self.moving_averages.clone(),
            volume: self.volume.clone(),
        }
    }
}

/// The twenty assets tracked by default.
pub fn default_instruments() -> Vec<Instrument> {
    [
        ("bitcoin", "BTC", "Bitcoin"),
        ("ethereum", "ETH", "Ethereum"),
        ("binancecoin", "BNB", "Binance Coin"),
        ("ripple", "XRP", "Ripple"),
        ("cardano", "ADA", "Cardano"),
        ("solana", "SOL", "Solana"),
        ("dogecoin", "DOGE", "Dogecoin"),
        ("polkadot", "DOT", "Polkadot"),
        ("matic-network", "MATIC", "Polygon"),
        ("litecoin", "LTC", "Litecoin"),
        ("avalanche-2", "AVAX", "Avalanche"),
        ("chainlink", "LINK", "Chainlink"),
        ("uniswap", "UNI", "Uniswap"),
        ("stellar", "XLM", "Stellar"),
        ("monero", "XMR", "Monero"),
        ("ethereum-classic", "ETC", "Ethereum Classic"),
        ("cosmos", "ATOM", "Cosmos"),
        ("algorand", "ALGO", "Algorand"),
        ("vechain", "VET", "VeChain"),
        ("filecoin", "FIL", "Filecoin"),
    ]
    .into_iter()
    .map(|(id, symbol, name)| Instrument::new(id, symbol, name))
    .collect()
}

fn invalid(msg: impl Into<String>) -> PulseError {
    PulseError::Config(msg.into())
}

impl AppConfig {
    /// Reject inconsistent settings.
    pub fn validate(&self) -> PulseResult<()> {
        match self.logging.format.as_str() {
            "pretty" | "compact" | "json" => {}
            other => {
                return Err(invalid(format!(
                    "logging.format must be pretty, compact or json, got {:?}",
                    other
                )))
            }
        }

        if self.provider.quote_currency.trim().is_empty() {
            return Err(invalid("provider.quote_currency must not be empty"));
        }
        if self.provider.request_timeout_secs == 0 || self.provider.history_timeout_secs == 0 {
            return Err(invalid("provider timeouts must be greater than 0"));
        }
        if self.gateway.call_timeout_secs == 0 {
            return Err(invalid("gateway.call_timeout_secs must be greater than 0"));
        }
        if self.analysis.window_days == 0 {
            return Err(invalid("analysis.window_days must be greater than 0"));
        }
        self.analysis
            .settings()
            .validate()
            .map_err(|e| invalid(format!("analysis: {}", e)))?;

        if self.instruments.is_empty() {
            return Err(invalid("at least one instrument is required"));
        }
        let mut ids = HashSet::new();
        let mut symbols = HashSet::new();
        for instrument in &self.instruments {
            if !ids.insert(instrument.provider_id.as_str()) {
                return Err(invalid(format!(
                    "duplicate instrument id: {}",
                    instrument.provider_id
                )));
            }
            if !symbols.insert(instrument.symbol.to_uppercase()) {
                return Err(invalid(format!(
                    "duplicate instrument symbol: {}",
                    instrument.symbol
                )));
            }
        }

        Ok(())
    }

    /// Tracked universe, with symbols normalized to upper case.
    pub fn universe(&self) -> Universe {
        Universe::new(
            self.instruments
                .iter()
                .map(|i| Instrument::new(&i.provider_id, &i.symbol, &i.display_name))
                .collect(),
        )
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
