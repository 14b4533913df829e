//! Risk-gated order submission.

use std::future::Future;
use std::sync::Arc;

use tracing::{info, warn};
use trading_core::error::{RiskLimitError, TradingResult};
use trading_core::traits::MarketDataSource;
use trading_core::types::{Order, RiskMetrics};
use trading_risk::RiskManager;

use crate::engine::TradingEngine;

/// Outcome of a position risk check.
#[derive(Debug, Clone)]
pub struct PositionReview {
    pub symbol: String,
    pub outcome: Result<(), RiskLimitError>,
}

impl PositionReview {
    pub fn is_breach(&self) -> bool {
        self.outcome.is_err()
    }
}

/// Front door that runs risk checks before the engine accepts anything.
///
/// Risk checks, including the AI score request, run without holding the
/// engine lock: positions are cloned out first and judged afterwards.
pub struct RiskGatedEngine {
    engine: Arc<TradingEngine>,
    risk: Arc<RiskManager>,
}

impl RiskGatedEngine {
    pub fn new(engine: Arc<TradingEngine>, risk: Arc<RiskManager>) -> Self {
        Self { engine, risk }
    }

    pub fn engine(&self) -> &TradingEngine {
        &self.engine
    }

    pub fn risk(&self) -> &RiskManager {
        &self.risk
    }

    /// Validate, risk-check and place an order. Rejected orders never reach the registry.
    pub async fn submit(&self, order: Order) -> TradingResult<()> {
        self.submit_until(order, std::future::pending()).await
    }

    /// Like [`submit`](Self::submit), giving up on the AI score once `cancel` resolves.
    pub async fn submit_until<F>(&self, order: Order, cancel: F) -> TradingResult<()>
    where
        F: Future<Output = ()> + Send,
    {
        self.engine.validate_order(&order)?;

        if let Err(breach) = self.risk.check_order_risk_until(&order, cancel).await {
            info!(
                order_id = %order.id,
                symbol = %order.symbol,
                check = breach.check(),
                reason = %breach,
                "Order rejected by risk manager"
            );
            return Err(breach.into());
        }

        self.engine.place_order(order)
    }

    /// Run position risk checks over every open (non-flat) position.
    pub async fn review_positions(&self) -> Vec<PositionReview> {
        let positions = self.engine.get_positions();
        let mut reviews = Vec::with_capacity(positions.len());

        for mut position in positions.into_iter().filter(|p| !p.is_flat()) {
            position.refresh_pnl();
            let outcome = self.risk.check_position_risk(&position).await;
            if let Err(breach) = &outcome {
                warn!(symbol = %position.symbol, check = breach.check(), reason = %breach, "Position breaches risk limits");
            }
            reviews.push(PositionReview {
                symbol: position.symbol,
                outcome,
            });
        }

        reviews
    }

    /// Aggregate account metrics from the engine's positions and check them.
    pub fn account_risk(&self) -> (RiskMetrics, Result<(), RiskLimitError>) {
        let metrics = self.risk.calculate_metrics(&self.engine.get_positions());
        let outcome = self.risk.check_account_risk(&metrics);
        (metrics, outcome)
    }

    /// Pull fresh snapshots for every held symbol and mark positions. Returns how many were updated.
    pub async fn refresh_market(&self, source: &dyn MarketDataSource) -> usize {
        let symbols: Vec<String> = self
            .engine
            .get_positions()
            .into_iter()
            .map(|p| p.symbol)
            .collect();

        source
            .snapshots(&symbols)
            .await
            .iter()
            .filter_map(|snapshot| self.engine.apply_market_snapshot(snapshot))
            .count()
    }
}
