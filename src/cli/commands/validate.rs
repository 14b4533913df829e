//! Validate configuration command.

use anyhow::Result;
use std::path::Path;
use trading_config::{AppConfig, ConfigLoadError};

pub fn run(config_path: &Path, loaded: Result<AppConfig, ConfigLoadError>) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match loaded {
        Ok(config) => {
            let limits = &config.risk.limits;
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Trading mode: {}", config.risk.mode);
            println!(
                "Order size: {} to {}",
                config.engine.min_order_size, config.engine.max_order_size
            );
            println!("Strict durability: {}", config.engine.strict_durability);
            println!("Max position size: {}", limits.max_position_size);
            println!("Max drawdown: {}", limits.max_drawdown);
            println!("Daily loss limit: {}", limits.max_daily_loss);
            println!("Min margin level: {}%", limits.min_margin_level);
            if config.scoring.enabled {
                println!(
                    "AI scoring: {} (timeout {}s)",
                    config.scoring.base_url, config.scoring.timeout_secs
                );
            } else {
                println!("AI scoring: disabled");
            }
            match &config.storage.orders_path {
                Some(path) => println!("Order journal: {}", path),
                None => println!("Order journal: in-memory"),
            }
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
