//! AI risk scoring trait.

use crate::error::ScoringError;
use crate::types::{Order, TradingMode};
use async_trait::async_trait;

/// External AI risk-scoring service.
///
/// Scores are advisory and the contract is fail-open: an `Err` from `score`
/// means "score unavailable" and callers must not block the order because of
/// it. Only a successfully returned score can reject an order.
#[async_trait]
pub trait RiskScorer: Send + Sync {
    /// Score an order in [0, 1], higher meaning riskier.
    ///
    /// # Arguments
    /// * `order` - The order (or a position rendered as an order) to assess
    /// * `mode` - The trading mode the risk manager is running in
    async fn score(&self, order: &Order, mode: TradingMode) -> Result<f64, ScoringError>;

    /// Get the scorer name.
    fn name(&self) -> &str;
}
