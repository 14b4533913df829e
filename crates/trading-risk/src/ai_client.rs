//! HTTP client for the AI risk-analysis service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use trading_core::error::ScoringError;
use trading_core::traits::RiskScorer;
use trading_core::types::{Order, TradingMode};

pub const DEFAULT_AI_BASE_URL: &str = "http://localhost:8000";

const ANALYZE_PATH: &str = "/api/v1/risk/analyze";

/// AI risk service connection settings.
#[derive(Debug, Clone)]
pub struct AiClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for AiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_AI_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    order: &'a Order,
    mode: TradingMode,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    risk_score: f64,
}

/// Scores orders by POSTing them to the risk-analysis endpoint.
///
/// One attempt per call, no retries. Any transport failure, non-success
/// status, undecodable body or out-of-range score is reported as an error,
/// which the risk manager treats as "score unavailable".
pub struct AiRiskClient {
    endpoint: String,
    client: Client,
}

impl AiRiskClient {
    /// Create a new client.
    pub fn new(config: AiClientConfig) -> Result<Self, ScoringError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(100)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| ScoringError::Transport(e.to_string()))?;

        let endpoint = format!("{}{}", config.base_url.trim_end_matches('/'), ANALYZE_PATH);
        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RiskScorer for AiRiskClient {
    async fn score(&self, order: &Order, mode: TradingMode) -> Result<f64, ScoringError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&AnalyzeRequest { order, mode })
            .send()
            .await
            .map_err(|e| ScoringError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ScoringError::Status(resp.status().as_u16()));
        }

        let body: AnalyzeResponse = resp
            .json()
            .await
            .map_err(|e| ScoringError::Decode(e.to_string()))?;

        if !(0.0..=1.0).contains(&body.risk_score) {
            return Err(ScoringError::OutOfRange(body.risk_score));
        }

        debug!(order_id = %order.id, score = body.risk_score, "AI risk score received");
        Ok(body.risk_score)
    }

    fn name(&self) -> &str {
        "ai-risk-service"
    }
}

/// Scorer used when AI scoring is switched off: every score is unavailable.
pub struct DisabledScorer;

#[async_trait]
impl RiskScorer for DisabledScorer {
    async fn score(&self, _order: &Order, _mode: TradingMode) -> Result<f64, ScoringError> {
        Err(ScoringError::Disabled)
    }

    fn name(&self) -> &str {
        "disabled"
    }
}
