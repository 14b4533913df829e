//! CLI command implementations.

pub mod check_position;
pub mod metrics;
pub mod submit;
pub mod validate;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use trading_config::AppConfig;
use trading_core::traits::{OrderStore, RiskScorer};
use trading_engine::{JsonlOrderStore, MemoryOrderStore, RiskGatedEngine, TradingEngine};
use trading_risk::{AiRiskClient, DisabledScorer, RiskManager};

/// Build the risk manager for the configured mode, with AI scoring if enabled.
pub fn build_risk_manager(config: &AppConfig) -> Result<RiskManager> {
    let scorer: Arc<dyn RiskScorer> = if config.scoring.enabled {
        let client = AiRiskClient::new(config.scoring.client_config())
            .context("Failed to build AI risk client")?;
        info!(endpoint = client.endpoint(), "AI risk scoring enabled");
        Arc::new(client)
    } else {
        warn!("AI risk scoring disabled, orders are judged on static limits only");
        Arc::new(DisabledScorer)
    };

    Ok(
        RiskManager::new(config.risk.limits.clone(), config.risk.mode, scorer)
            .with_score_timeout(config.scoring.timeout()),
    )
}

/// Build the engine behind its risk gate.
pub fn build_gateway(config: &AppConfig) -> Result<RiskGatedEngine> {
    let store: Arc<dyn OrderStore> = match &config.storage.orders_path {
        Some(path) => Arc::new(
            JsonlOrderStore::open(path)
                .with_context(|| format!("Failed to open order journal {}", path))?,
        ),
        None => Arc::new(MemoryOrderStore::new()),
    };

    let engine = Arc::new(TradingEngine::new(config.engine.clone(), store));
    let risk = Arc::new(build_risk_manager(config)?);
    Ok(RiskGatedEngine::new(engine, risk))
}

/// Read and parse a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Resolves on Ctrl-C. Used to abandon an in-flight AI score request.
pub async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
