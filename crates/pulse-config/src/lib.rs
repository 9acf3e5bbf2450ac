//! Configuration management.
//!
//! Settings come from built-in defaults, an optional TOML file and
//! `PULSE__SECTION__KEY` environment variables, in increasing priority.

mod settings;

pub use settings::{
    default_instruments, AnalysisConfig, AppConfig, AppSettings, CacheConfig, GatewayConfig,
    LoggingConfig, ProviderConfig,
};

pub use config::ConfigError;

use config::{Config, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
///
/// A missing `path` means defaults plus environment only.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }

    let config = builder
        .add_source(
            Environment::with_prefix("PULSE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app: AppConfig = config.try_deserialize()?;
    app.validate()
        .map_err(|e| ConfigError::Message(e.to_string()))?;
    Ok(app)
}
