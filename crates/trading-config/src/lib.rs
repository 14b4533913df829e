//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, LoggingConfig, RiskSettings, ScoringSettings, StorageSettings,
};

use config::{Config, Environment, File};
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("config source error: {0}")]
    Source(#[from] config::ConfigError),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Load configuration from file and environment, then validate it.
///
/// Environment variables use the `TRADING` prefix with `__` between
/// levels, e.g. `TRADING__RISK__MODE=pump_fun`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigLoadError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("TRADING")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app: AppConfig = config.try_deserialize()?;
    app.validate()?;
    Ok(app)
}
