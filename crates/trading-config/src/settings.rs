//! Configuration structures.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trading_core::types::TradingMode;
use trading_engine::EngineConfig;
use trading_risk::{AiClientConfig, Limits, DEFAULT_AI_BASE_URL};

use crate::ConfigLoadError;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub risk: RiskSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

impl AppConfig {
    /// Parse a TOML document. Missing sections fall back to defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigLoadError> {
        Ok(toml::from_str(text)?)
    }

    /// Reject settings the engine and risk manager cannot run with.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.engine.min_order_size <= Decimal::ZERO {
            return Err(ConfigLoadError::Invalid(format!(
                "engine.min_order_size must be positive, got {}",
                self.engine.min_order_size
            )));
        }
        if self.engine.min_order_size > self.engine.max_order_size {
            return Err(ConfigLoadError::Invalid(format!(
                "engine.min_order_size {} exceeds engine.max_order_size {}",
                self.engine.min_order_size, self.engine.max_order_size
            )));
        }

        let negative = self.risk.limits.negative_fields();
        if !negative.is_empty() {
            return Err(ConfigLoadError::Invalid(format!(
                "negative risk limits: {}",
                negative.join(", ")
            )));
        }

        if self.scoring.enabled && self.scoring.timeout_secs == 0 {
            return Err(ConfigLoadError::Invalid(
                "scoring.timeout_secs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "dex-trader".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Risk management settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskSettings {
    pub mode: TradingMode,
    pub limits: Limits,
}

/// AI risk scoring settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    pub enabled: bool,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ScoringSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn client_config(&self) -> AiClientConfig {
        AiClientConfig {
            base_url: self.base_url.clone(),
            timeout: self.timeout(),
        }
    }
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_AI_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

/// Order persistence settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// JSON lines order journal; orders are kept in memory only when unset
    pub orders_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.app.name, "dex-trader");
        assert_eq!(config.risk.mode, TradingMode::DexSwap);
        assert_eq!(config.engine.min_order_size, dec!(0.01));
        assert_eq!(config.scoring.base_url, "http://localhost:8000");
        assert_eq!(config.scoring.timeout(), Duration::from_secs(10));
        assert!(config.storage.orders_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml_str(
            r#"
            [logging]
            format = "json"

            [engine]
            max_order_size = 500
            strict_durability = true

            [risk]
            mode = "pump_fun"

            [risk.limits]
            max_drawdown = 0.1

            [risk.limits.pump_fun]
            min_holders = 250

            [scoring]
            enabled = false

            [storage]
            orders_path = "data/orders.jsonl"
            "#,
        )
        .unwrap();

        assert!(config.logging.is_json());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.engine.max_order_size, dec!(500));
        assert_eq!(config.engine.min_order_size, dec!(0.01));
        assert!(config.engine.strict_durability);
        assert_eq!(config.risk.mode, TradingMode::PumpFun);
        assert_eq!(config.risk.limits.max_drawdown, dec!(0.1));
        assert_eq!(config.risk.limits.max_position_size, dec!(1000));
        assert_eq!(config.risk.limits.pump_fun.min_holders, 250);
        assert_eq!(config.risk.limits.pump_fun.min_volume, dec!(10000));
        assert!(!config.scoring.enabled);
        assert_eq!(config.storage.orders_path.as_deref(), Some("data/orders.jsonl"));
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let mut config = AppConfig::default();
        config.engine.min_order_size = dec!(10);
        config.engine.max_order_size = dec!(5);
        assert!(matches!(config.validate(), Err(ConfigLoadError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_negative_limits() {
        let mut config = AppConfig::default();
        config.risk.limits.pump_fun.min_volume = dec!(-5);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("pump_fun.min_volume"));
    }

    #[test]
    fn test_zero_timeout_only_matters_when_enabled() {
        let mut config = AppConfig::default();
        config.scoring.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.scoring.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let err = AppConfig::from_toml_str("[risk]\nmode = \"futures\"\n").unwrap_err();
        assert!(matches!(err, ConfigLoadError::Toml(_)));
    }
}
