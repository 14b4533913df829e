//! Mode-aware risk manager.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};
use trading_core::error::{RiskLimitError, ScoringError};
use trading_core::traits::RiskScorer;
use trading_core::types::{Order, OrderType, Position, RiskMetrics, Side, TradingMode};

use crate::limits::{DexLimits, Limits, ModeLimits, PumpFunLimits};

/// Scores strictly above this reject the order.
pub const AI_SCORE_THRESHOLD: f64 = 0.7;

/// Budget for a single AI scoring request.
pub const DEFAULT_SCORE_TIMEOUT: Duration = Duration::from_secs(10);

/// Fixed margin requirement applied to position notional.
const MARGIN_REQUIREMENT: Decimal = dec!(0.1);
/// Maximum position notional as a share of the DEX pool.
const MAX_POOL_SHARE: Decimal = dec!(0.1);
/// Maximum position notional as a share of the token market cap.
const MAX_MARKET_CAP_SHARE: Decimal = dec!(0.01);
/// Maximum position notional as a share of traded volume.
const MAX_VOLUME_SHARE: Decimal = dec!(0.2);

/// Gates orders, positions and accounts against fixed limits for one trading mode.
///
/// The manager holds no mutable state and can be shared across tasks. It never
/// touches the engine; callers pass in the order, position or metrics to judge.
pub struct RiskManager {
    limits: Limits,
    mode_limits: ModeLimits,
    scorer: Arc<dyn RiskScorer>,
    score_timeout: Duration,
}

impl RiskManager {
    /// Create a new risk manager. `limits` and `mode` are fixed for its lifetime.
    pub fn new(limits: Limits, mode: TradingMode, scorer: Arc<dyn RiskScorer>) -> Self {
        let mode_limits = limits.for_mode(mode);
        Self {
            limits,
            mode_limits,
            scorer,
            score_timeout: DEFAULT_SCORE_TIMEOUT,
        }
    }

    /// Override the AI scoring timeout.
    pub fn with_score_timeout(mut self, timeout: Duration) -> Self {
        self.score_timeout = timeout;
        self
    }

    pub fn mode(&self) -> TradingMode {
        self.mode_limits.mode()
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Check if an order complies with base, mode and AI score limits.
    pub async fn check_order_risk(&self, order: &Order) -> Result<(), RiskLimitError> {
        self.check_order_risk_until(order, std::future::pending()).await
    }

    /// Like [`check_order_risk`](Self::check_order_risk), abandoning the AI
    /// score request once `cancel` resolves. A canceled request counts as
    /// "score unavailable".
    pub async fn check_order_risk_until<F>(
        &self,
        order: &Order,
        cancel: F,
    ) -> Result<(), RiskLimitError>
    where
        F: Future<Output = ()> + Send,
    {
        if order.quantity > self.limits.max_position_size {
            return Err(RiskLimitError::OrderSizeExceeded {
                quantity: order.quantity,
                limit: self.limits.max_position_size,
            });
        }

        match &self.mode_limits {
            ModeLimits::Dex(dex) => check_dex_order(dex, order)?,
            ModeLimits::PumpFun(pump) => check_pump_fun_order(pump, order)?,
        }

        if let Some(score) = self.fetch_score(order, cancel).await {
            if score > AI_SCORE_THRESHOLD {
                return Err(RiskLimitError::AiScoreTooHigh {
                    score,
                    threshold: AI_SCORE_THRESHOLD,
                });
            }
        }

        debug!(order_id = %order.id, symbol = %order.symbol, mode = %self.mode(), "Order passed risk checks");
        Ok(())
    }

    /// Check if a position complies with size, drawdown, mode and AI score limits.
    pub async fn check_position_risk(&self, position: &Position) -> Result<(), RiskLimitError> {
        self.check_position_risk_until(position, std::future::pending())
            .await
    }

    /// Position check with a caller-supplied cancellation for the AI score request.
    pub async fn check_position_risk_until<F>(
        &self,
        position: &Position,
        cancel: F,
    ) -> Result<(), RiskLimitError>
    where
        F: Future<Output = ()> + Send,
    {
        let size = position.quantity.abs();
        if size > self.limits.max_position_size {
            return Err(RiskLimitError::PositionSizeExceeded {
                quantity: size,
                limit: self.limits.max_position_size,
            });
        }

        if position.unrealized_pnl < Decimal::ZERO {
            if let Some(drawdown) = share_of(position.unrealized_pnl.abs(), position.notional()) {
                if drawdown > self.limits.max_drawdown {
                    return Err(RiskLimitError::DrawdownExceeded {
                        drawdown,
                        limit: self.limits.max_drawdown,
                    });
                }
            }
        }

        match &self.mode_limits {
            ModeLimits::Dex(dex) => check_dex_position(dex, position)?,
            ModeLimits::PumpFun(pump) => check_pump_fun_position(pump, position)?,
        }

        let probe = position_as_order(position);
        if let Some(score) = self.fetch_score(&probe, cancel).await {
            if score > AI_SCORE_THRESHOLD {
                return Err(RiskLimitError::AiScoreTooHigh {
                    score,
                    threshold: AI_SCORE_THRESHOLD,
                });
            }
        }

        Ok(())
    }

    /// Check account-wide daily loss and margin level.
    pub fn check_account_risk(&self, metrics: &RiskMetrics) -> Result<(), RiskLimitError> {
        if metrics.daily_pnl < -self.limits.max_daily_loss {
            return Err(RiskLimitError::DailyLossExceeded {
                daily_pnl: metrics.daily_pnl,
                limit: self.limits.max_daily_loss,
            });
        }

        if metrics.margin_level < self.limits.min_margin_level {
            return Err(RiskLimitError::MarginLevelTooLow {
                margin_level: metrics.margin_level,
                min: self.limits.min_margin_level,
            });
        }

        Ok(())
    }

    /// Aggregate account metrics from a set of positions.
    ///
    /// Sums saturate at the `Decimal` bounds, and an unrepresentable margin
    /// level saturates with the sign of equity.
    pub fn calculate_metrics(&self, positions: &[Position]) -> RiskMetrics {
        let user_id = positions
            .first()
            .map(|p| p.user_id.clone())
            .unwrap_or_default();
        let mut metrics = RiskMetrics::empty(user_id);

        for pos in positions {
            let value = pos.notional();
            metrics.used_margin = metrics
                .used_margin
                .saturating_add(value.saturating_mul(MARGIN_REQUIREMENT));
            metrics.total_equity = metrics
                .total_equity
                .saturating_add(value.saturating_add(pos.unrealized_pnl));
            metrics.daily_pnl = metrics
                .daily_pnl
                .saturating_add(pos.unrealized_pnl.saturating_add(pos.realized_pnl));
            metrics.total_exposure = metrics.total_exposure.saturating_add(value);
            metrics.max_position_size = metrics.max_position_size.max(pos.quantity.abs());
        }

        metrics.available_margin = metrics.total_equity.saturating_sub(metrics.used_margin);
        if metrics.used_margin > Decimal::ZERO {
            metrics.margin_level = match metrics.total_equity.checked_div(metrics.used_margin) {
                Some(ratio) => ratio.saturating_mul(dec!(100)),
                None if metrics.total_equity.is_sign_negative() => Decimal::MIN,
                None => Decimal::MAX,
            };
        }
        metrics.peak_equity = metrics.total_equity;

        metrics
    }

    /// Ask the scorer for a score. `None` when the score is unavailable for any reason.
    async fn fetch_score<F>(&self, order: &Order, cancel: F) -> Option<f64>
    where
        F: Future<Output = ()> + Send,
    {
        let request = tokio::time::timeout(self.score_timeout, self.scorer.score(order, self.mode()));

        let outcome = tokio::select! {
            outcome = request => match outcome {
                Ok(result) => result,
                Err(_) => Err(ScoringError::Timeout(self.score_timeout.as_millis() as u64)),
            },
            _ = cancel => Err(ScoringError::Canceled),
        };

        match outcome {
            Ok(score) => Some(score),
            Err(e) => {
                warn!(symbol = %order.symbol, scorer = self.scorer.name(), error = %e, "AI risk score unavailable, failing open");
                None
            }
        }
    }
}

fn check_dex_order(dex: &DexLimits, order: &Order) -> Result<(), RiskLimitError> {
    let m = &order.market;
    if m.slippage > dex.max_slippage {
        return Err(RiskLimitError::SlippageTooHigh {
            slippage: m.slippage,
            limit: dex.max_slippage,
        });
    }
    if m.price_impact > dex.max_impact {
        return Err(RiskLimitError::PriceImpactTooHigh {
            impact: m.price_impact,
            limit: dex.max_impact,
        });
    }
    if m.spread > dex.max_spread {
        return Err(RiskLimitError::SpreadTooHigh {
            spread: m.spread,
            limit: dex.max_spread,
        });
    }
    if m.pool_size < dex.min_pool_size {
        return Err(RiskLimitError::PoolSizeTooSmall {
            pool_size: m.pool_size,
            min: dex.min_pool_size,
        });
    }
    Ok(())
}

fn check_pump_fun_order(pump: &PumpFunLimits, order: &Order) -> Result<(), RiskLimitError> {
    let m = &order.market;
    if m.market_cap < pump.min_market_cap {
        return Err(RiskLimitError::MarketCapTooLow {
            market_cap: m.market_cap,
            min: pump.min_market_cap,
        });
    }
    if m.volume < pump.min_volume {
        return Err(RiskLimitError::VolumeTooLow {
            volume: m.volume,
            min: pump.min_volume,
        });
    }
    if m.holders < pump.min_holders {
        return Err(RiskLimitError::TooFewHolders {
            holders: m.holders,
            min: pump.min_holders,
        });
    }
    if m.volatility > pump.max_volatility {
        return Err(RiskLimitError::VolatilityTooHigh {
            volatility: m.volatility,
            limit: pump.max_volatility,
        });
    }
    if m.social_score < pump.min_social_score {
        return Err(RiskLimitError::SocialScoreTooLow {
            score: m.social_score,
            min: pump.min_social_score,
        });
    }
    Ok(())
}

fn check_dex_position(dex: &DexLimits, position: &Position) -> Result<(), RiskLimitError> {
    let m = &position.market;
    if let Some(share) = share_of(position.notional(), m.pool_size) {
        if share > MAX_POOL_SHARE {
            return Err(RiskLimitError::PoolShareExceeded {
                pct: as_pct(share),
                limit_pct: as_pct(MAX_POOL_SHARE),
            });
        }
    }
    if m.spread > dex.max_spread {
        return Err(RiskLimitError::SpreadTooHigh {
            spread: m.spread,
            limit: dex.max_spread,
        });
    }
    Ok(())
}

fn check_pump_fun_position(pump: &PumpFunLimits, position: &Position) -> Result<(), RiskLimitError> {
    let m = &position.market;
    let notional = position.notional();

    if let Some(share) = share_of(notional, m.market_cap) {
        if share > MAX_MARKET_CAP_SHARE {
            return Err(RiskLimitError::MarketCapShareExceeded {
                pct: as_pct(share),
                limit_pct: as_pct(MAX_MARKET_CAP_SHARE),
            });
        }
    }
    if let Some(share) = share_of(notional, m.volume) {
        if share > MAX_VOLUME_SHARE {
            return Err(RiskLimitError::VolumeShareExceeded {
                pct: as_pct(share),
                limit_pct: as_pct(MAX_VOLUME_SHARE),
            });
        }
    }
    if m.volatility > pump.max_volatility {
        return Err(RiskLimitError::VolatilityTooHigh {
            volatility: m.volatility,
            limit: pump.max_volatility,
        });
    }
    Ok(())
}

/// `numerator / denominator`, or `None` when the denominator is not positive.
/// A quotient too large to represent is `Decimal::MAX`.
fn share_of(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator <= Decimal::ZERO {
        return None;
    }
    Some(numerator.checked_div(denominator).unwrap_or(Decimal::MAX))
}

fn as_pct(ratio: Decimal) -> Decimal {
    ratio.saturating_mul(dec!(100))
}

/// Render a position as a market order so the scorer can judge it.
fn position_as_order(position: &Position) -> Order {
    let side = if position.is_short() { Side::Sell } else { Side::Buy };
    Order::new(
        position.user_id.clone(),
        position.symbol.clone(),
        side,
        OrderType::Market,
        position.avg_price,
        position.quantity.abs(),
    )
    .with_market(position.market.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use trading_core::error::ScoringError;
    use trading_core::types::MarketContext;

    struct FixedScorer(f64);

    #[async_trait]
    impl RiskScorer for FixedScorer {
        async fn score(&self, _order: &Order, _mode: TradingMode) -> Result<f64, ScoringError> {
            Ok(self.0)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[derive(Default)]
    struct UnreachableScorer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RiskScorer for UnreachableScorer {
        async fn score(&self, _order: &Order, _mode: TradingMode) -> Result<f64, ScoringError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ScoringError::Transport("connection refused".into()))
        }

        fn name(&self) -> &str {
            "unreachable"
        }
    }

    struct StalledScorer;

    #[async_trait]
    impl RiskScorer for StalledScorer {
        async fn score(&self, _order: &Order, _mode: TradingMode) -> Result<f64, ScoringError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(1.0)
        }

        fn name(&self) -> &str {
            "stalled"
        }
    }

    fn manager(mode: TradingMode, score: f64) -> RiskManager {
        RiskManager::new(Limits::default(), mode, Arc::new(FixedScorer(score)))
    }

    fn dex_market() -> MarketContext {
        MarketContext {
            slippage: dec!(0.005),
            price_impact: dec!(0.01),
            spread: dec!(0.001),
            pool_size: dec!(250000),
            ..Default::default()
        }
    }

    fn meme_market() -> MarketContext {
        MarketContext {
            market_cap: dec!(500000),
            volume: dec!(50000),
            holders: 400,
            volatility: dec!(0.3),
            social_score: dec!(0.6),
            ..Default::default()
        }
    }

    fn dex_order() -> Order {
        Order::limit("alice", "SOL/USDC", Side::Buy, dec!(10), dec!(150)).with_market(dex_market())
    }

    fn meme_order() -> Order {
        Order::market("alice", "PEPE", Side::Buy, dec!(100)).with_market(meme_market())
    }

    #[tokio::test]
    async fn test_dex_order_passes() {
        let rm = manager(TradingMode::DexSwap, 0.2);
        assert!(rm.check_order_risk(&dex_order()).await.is_ok());
    }

    #[tokio::test]
    async fn test_order_size_limit() {
        let rm = manager(TradingMode::DexSwap, 0.2);
        let mut order = dex_order();
        order.quantity = dec!(1000.5);

        let err = rm.check_order_risk(&order).await.unwrap_err();
        assert_eq!(
            err,
            RiskLimitError::OrderSizeExceeded {
                quantity: dec!(1000.5),
                limit: dec!(1000)
            }
        );
    }

    #[tokio::test]
    async fn test_slippage_boundary() {
        let rm = manager(TradingMode::DexSwap, 0.2);
        let max = rm.limits().dex.max_slippage;

        let mut order = dex_order();
        order.market.slippage = max;
        assert!(rm.check_order_risk(&order).await.is_ok());

        order.market.slippage = max + dec!(0.001);
        let err = rm.check_order_risk(&order).await.unwrap_err();
        assert_eq!(err.check(), "slippage");
        assert_eq!(err.to_string(), "slippage too high: 0.011 > 0.01");
    }

    #[tokio::test]
    async fn test_dex_checks_report_first_violation() {
        let rm = manager(TradingMode::DexSwap, 0.2);
        let mut order = dex_order();
        order.market.price_impact = dec!(0.5);
        order.market.pool_size = dec!(1);

        let err = rm.check_order_risk(&order).await.unwrap_err();
        assert_eq!(err.check(), "price_impact");
    }

    #[tokio::test]
    async fn test_dex_pool_too_small() {
        let rm = manager(TradingMode::DexSwap, 0.2);
        let mut order = dex_order();
        order.market.pool_size = dec!(49999);

        let err = rm.check_order_risk(&order).await.unwrap_err();
        assert_eq!(
            err,
            RiskLimitError::PoolSizeTooSmall {
                pool_size: dec!(49999),
                min: dec!(50000)
            }
        );
    }

    #[tokio::test]
    async fn test_pump_fun_holders_boundary() {
        let rm = manager(TradingMode::PumpFun, 0.2);
        let min = rm.limits().pump_fun.min_holders;

        let mut order = meme_order();
        order.market.holders = min - 1;
        let err = rm.check_order_risk(&order).await.unwrap_err();
        assert_eq!(
            err,
            RiskLimitError::TooFewHolders {
                holders: min - 1,
                min
            }
        );

        order.market.holders = min;
        assert!(rm.check_order_risk(&order).await.is_ok());
    }

    #[tokio::test]
    async fn test_pump_fun_ignores_dex_fields() {
        let rm = manager(TradingMode::PumpFun, 0.2);
        let mut order = meme_order();
        order.market.slippage = dec!(0.9);
        assert!(rm.check_order_risk(&order).await.is_ok());
    }

    #[tokio::test]
    async fn test_ai_score_above_threshold_rejects() {
        let rm = manager(TradingMode::DexSwap, 0.71);
        let err = rm.check_order_risk(&dex_order()).await.unwrap_err();
        assert_eq!(err.check(), "ai_score");

        let rm = manager(TradingMode::DexSwap, 0.7);
        assert!(rm.check_order_risk(&dex_order()).await.is_ok());
    }

    #[tokio::test]
    async fn test_scorer_failure_is_fail_open() {
        let scorer = Arc::new(UnreachableScorer::default());
        let rm = RiskManager::new(Limits::default(), TradingMode::DexSwap, scorer.clone());

        assert!(rm.check_order_risk(&dex_order()).await.is_ok());
        assert_eq!(scorer.calls.load(Ordering::SeqCst), 1);

        // Deterministic checks still apply
        let mut order = dex_order();
        order.market.spread = dec!(0.1);
        assert!(rm.check_order_risk(&order).await.is_err());
    }

    #[tokio::test]
    async fn test_scorer_timeout_is_fail_open() {
        let rm = RiskManager::new(Limits::default(), TradingMode::DexSwap, Arc::new(StalledScorer))
            .with_score_timeout(Duration::from_millis(20));
        assert!(rm.check_order_risk(&dex_order()).await.is_ok());
    }

    #[tokio::test]
    async fn test_scorer_cancel_is_fail_open() {
        let rm = RiskManager::new(Limits::default(), TradingMode::DexSwap, Arc::new(StalledScorer));
        let cancel = tokio::time::sleep(Duration::from_millis(10));
        assert!(rm.check_order_risk_until(&dex_order(), cancel).await.is_ok());
    }

    #[tokio::test]
    async fn test_position_drawdown() {
        let rm = manager(TradingMode::DexSwap, 0.1);
        let mut position = Position::new("SOL/USDC", dec!(10), dec!(100)).with_market(dex_market());
        position.unrealized_pnl = dec!(-250);

        let err = rm.check_position_risk(&position).await.unwrap_err();
        assert_eq!(
            err,
            RiskLimitError::DrawdownExceeded {
                drawdown: dec!(0.25),
                limit: dec!(0.2)
            }
        );

        position.unrealized_pnl = dec!(-200);
        assert!(rm.check_position_risk(&position).await.is_ok());
    }

    #[tokio::test]
    async fn test_short_position_size_uses_absolute_quantity() {
        let rm = manager(TradingMode::DexSwap, 0.1);
        let position = Position::new("SOL/USDC", dec!(-1500), dec!(1)).with_market(dex_market());

        let err = rm.check_position_risk(&position).await.unwrap_err();
        assert_eq!(err.check(), "position_size");
    }

    #[tokio::test]
    async fn test_dex_position_pool_share() {
        let rm = manager(TradingMode::DexSwap, 0.1);
        // 300 * 100 = 30_000 notional against a 250_000 pool = 12%
        let position = Position::new("SOL/USDC", dec!(300), dec!(100)).with_market(dex_market());

        let err = rm.check_position_risk(&position).await.unwrap_err();
        assert_eq!(
            err,
            RiskLimitError::PoolShareExceeded {
                pct: dec!(12),
                limit_pct: dec!(10)
            }
        );
    }

    #[tokio::test]
    async fn test_position_share_checks_skip_zero_denominators() {
        let rm = manager(TradingMode::PumpFun, 0.1);
        let position = Position::new("PEPE", dec!(900), dec!(1000));
        assert!(rm.check_position_risk(&position).await.is_ok());

        let rm = manager(TradingMode::DexSwap, 0.1);
        let position = Position::new("SOL/USDC", dec!(900), dec!(1000));
        assert!(rm.check_position_risk(&position).await.is_ok());
    }

    #[tokio::test]
    async fn test_pump_fun_position_shares() {
        let rm = manager(TradingMode::PumpFun, 0.1);

        // 6000 / 500_000 = 1.2% of market cap
        let position = Position::new("PEPE", dec!(600), dec!(10)).with_market(meme_market());
        let err = rm.check_position_risk(&position).await.unwrap_err();
        assert_eq!(err.check(), "market_cap_share");

        // 4000 / 500_000 = 0.8% of cap, 4000 / 15_000 = 26.7% of volume
        let mut market = meme_market();
        market.volume = dec!(15000);
        let position = Position::new("PEPE", dec!(400), dec!(10)).with_market(market);
        let err = rm.check_position_risk(&position).await.unwrap_err();
        assert_eq!(err.check(), "volume_share");
    }

    #[tokio::test]
    async fn test_position_ai_score() {
        let rm = manager(TradingMode::PumpFun, 0.95);
        let position = Position::new("PEPE", dec!(1), dec!(1)).with_market(meme_market());
        let err = rm.check_position_risk(&position).await.unwrap_err();
        assert_eq!(err.check(), "ai_score");
    }

    #[test]
    fn test_account_risk() {
        let rm = manager(TradingMode::DexSwap, 0.1);
        let mut metrics = RiskMetrics::empty("alice");
        metrics.margin_level = dec!(200);

        metrics.daily_pnl = dec!(-1000);
        assert!(rm.check_account_risk(&metrics).is_ok());

        metrics.daily_pnl = dec!(-1000.01);
        let err = rm.check_account_risk(&metrics).unwrap_err();
        assert_eq!(err.check(), "daily_loss");

        metrics.daily_pnl = Decimal::ZERO;
        metrics.margin_level = dec!(149);
        let err = rm.check_account_risk(&metrics).unwrap_err();
        assert_eq!(
            err,
            RiskLimitError::MarginLevelTooLow {
                margin_level: dec!(149),
                min: dec!(150)
            }
        );
    }

    #[test]
    fn test_calculate_metrics_empty() {
        let rm = manager(TradingMode::DexSwap, 0.1);
        let metrics = rm.calculate_metrics(&[]);

        assert_eq!(metrics.used_margin, Decimal::ZERO);
        assert_eq!(metrics.total_equity, Decimal::ZERO);
        assert_eq!(metrics.available_margin, Decimal::ZERO);
        assert_eq!(metrics.margin_level, Decimal::ZERO);
        assert_eq!(metrics.daily_pnl, Decimal::ZERO);
    }

    #[test]
    fn test_calculate_metrics_single_position() {
        let rm = manager(TradingMode::DexSwap, 0.1);
        let mut position = Position::new("SOL/USDC", dec!(10), dec!(5));
        position.unrealized_pnl = dec!(-2);

        let metrics = rm.calculate_metrics(&[position]);
        assert_eq!(metrics.used_margin, dec!(5.0));
        assert_eq!(metrics.total_equity, dec!(48.0));
        assert_eq!(metrics.available_margin, dec!(43.0));
        assert_eq!(metrics.margin_level, dec!(960.0));
        assert_eq!(metrics.daily_pnl, dec!(-2));
        assert_eq!(metrics.total_exposure, dec!(50));
        assert_eq!(metrics.max_position_size, dec!(10));
    }

    #[tokio::test]
    async fn test_pump_fun_market_cap_boundary() {
        let rm = manager(TradingMode::PumpFun, 0.2);
        let min = rm.limits().pump_fun.min_market_cap;

        let mut order = meme_order();
        order.market.market_cap = min;
        assert!(rm.check_order_risk(&order).await.is_ok());

        order.market.market_cap = min - dec!(0.01);
        let err = rm.check_order_risk(&order).await.unwrap_err();
        assert_eq!(
            err,
            RiskLimitError::MarketCapTooLow {
                market_cap: dec!(99999.99),
                min
            }
        );
    }

    #[tokio::test]
    async fn test_pump_fun_volume_boundary() {
        let rm = manager(TradingMode::PumpFun, 0.2);
        let min = rm.limits().pump_fun.min_volume;

        let mut order = meme_order();
        order.market.volume = min;
        assert!(rm.check_order_risk(&order).await.is_ok());

        order.market.volume = min - dec!(0.01);
        let err = rm.check_order_risk(&order).await.unwrap_err();
        assert_eq!(err.check(), "volume");
    }

    #[tokio::test]
    async fn test_pump_fun_volatility_boundary() {
        let rm = manager(TradingMode::PumpFun, 0.2);
        let max = rm.limits().pump_fun.max_volatility;

        let mut order = meme_order();
        order.market.volatility = max;
        assert!(rm.check_order_risk(&order).await.is_ok());

        order.market.volatility = max + dec!(0.01);
        let err = rm.check_order_risk(&order).await.unwrap_err();
        assert_eq!(err.check(), "volatility");
        assert_eq!(err.to_string(), "volatility too high: 0.51 > 0.5");
    }

    #[tokio::test]
    async fn test_pump_fun_social_score_boundary() {
        let rm = manager(TradingMode::PumpFun, 0.2);
        let min = rm.limits().pump_fun.min_social_score;

        let mut order = meme_order();
        order.market.social_score = min;
        assert!(rm.check_order_risk(&order).await.is_ok());

        order.market.social_score = min - dec!(0.01);
        let err = rm.check_order_risk(&order).await.unwrap_err();
        assert_eq!(err.check(), "social_score");
    }

    #[tokio::test]
    async fn test_pump_fun_checks_report_first_violation() {
        let rm = manager(TradingMode::PumpFun, 0.2);
        let mut order = meme_order();
        order.market.market_cap = dec!(10);
        order.market.volume = dec!(10);
        order.market.holders = 1;
        order.market.volatility = dec!(0.9);
        order.market.social_score = Decimal::ZERO;

        let err = rm.check_order_risk(&order).await.unwrap_err();
        assert_eq!(err.check(), "market_cap");

        order.market.market_cap = dec!(500000);
        let err = rm.check_order_risk(&order).await.unwrap_err();
        assert_eq!(err.check(), "volume");
    }

    #[tokio::test]
    async fn test_dex_position_spread_boundary() {
        let rm = manager(TradingMode::DexSwap, 0.1);
        let max = rm.limits().dex.max_spread;
        let mut position = Position::new("SOL/USDC", dec!(10), dec!(100)).with_market(dex_market());

        position.market.spread = max;
        assert!(rm.check_position_risk(&position).await.is_ok());

        position.market.spread = max + dec!(0.001);
        let err = rm.check_position_risk(&position).await.unwrap_err();
        assert_eq!(
            err,
            RiskLimitError::SpreadTooHigh {
                spread: dec!(0.006),
                limit: max
            }
        );
    }

    #[tokio::test]
    async fn test_pump_fun_position_volatility_boundary() {
        let rm = manager(TradingMode::PumpFun, 0.1);
        let max = rm.limits().pump_fun.max_volatility;
        let mut position = Position::new("PEPE", dec!(10), dec!(10)).with_market(meme_market());

        position.market.volatility = max;
        assert!(rm.check_position_risk(&position).await.is_ok());

        position.market.volatility = max + dec!(0.01);
        let err = rm.check_position_risk(&position).await.unwrap_err();
        assert_eq!(err.check(), "volatility");
    }

    #[tokio::test]
    async fn test_share_checks_survive_tiny_denominators() {
        let rm = manager(TradingMode::DexSwap, 0.1);
        let mut market = dex_market();
        market.pool_size = Decimal::new(1, 28);
        let position = Position::new("SOL/USDC", dec!(10), dec!(100)).with_market(market);

        let err = rm.check_position_risk(&position).await.unwrap_err();
        assert_eq!(
            err,
            RiskLimitError::PoolShareExceeded {
                pct: Decimal::MAX,
                limit_pct: dec!(10)
            }
        );

        let rm = manager(TradingMode::PumpFun, 0.1);
        let mut market = meme_market();
        market.market_cap = Decimal::new(1, 28);
        let position = Position::new("PEPE", dec!(10), dec!(100)).with_market(market);
        let err = rm.check_position_risk(&position).await.unwrap_err();
        assert_eq!(err.check(), "market_cap_share");
    }

    #[tokio::test]
    async fn test_drawdown_on_tiny_notional_is_a_breach() {
        let rm = manager(TradingMode::DexSwap, 0.1);
        let mut position = Position::new("SOL/USDC", Decimal::new(1, 28), dec!(1)).with_market(dex_market());
        position.unrealized_pnl = dec!(-1000000);

        let err = rm.check_position_risk(&position).await.unwrap_err();
        assert_eq!(
            err,
            RiskLimitError::DrawdownExceeded {
                drawdown: Decimal::MAX,
                limit: dec!(0.2)
            }
        );
    }

    #[test]
    fn test_calculate_metrics_saturates() {
        let rm = manager(TradingMode::PumpFun, 0.1);
        let whale = Position::new("BONK", Decimal::from(10u64.pow(15)), Decimal::from(10u64.pow(14)));

        let metrics = rm.calculate_metrics(&[whale.clone(), whale]);
        assert_eq!(metrics.total_exposure, Decimal::MAX);
        assert_eq!(metrics.total_equity, Decimal::MAX);
        assert!(metrics.used_margin > Decimal::ZERO);
        assert!(rm.check_account_risk(&metrics).is_ok());
    }

    #[test]
    fn test_margin_level_saturates_with_equity_sign() {
        let rm = manager(TradingMode::DexSwap, 0.1);
        let mut position = Position::new("SOL/USDC", Decimal::ONE, Decimal::new(1, 27));
        position.unrealized_pnl = Decimal::from(10u64.pow(18));

        let metrics = rm.calculate_metrics(std::slice::from_ref(&position));
        assert_eq!(metrics.margin_level, Decimal::MAX);

        position.unrealized_pnl = -Decimal::from(10u64.pow(18));
        let metrics = rm.calculate_metrics(&[position]);
        assert_eq!(metrics.margin_level, Decimal::MIN);
        assert_eq!(rm.check_account_risk(&metrics).unwrap_err().check(), "daily_loss");
    }

    #[test]
    fn test_position_as_order_fields() {
        let position = Position::new("PEPE", dec!(-25), dec!(4))
            .with_user("bob")
            .with_market(meme_market());

        let order = position_as_order(&position);
        assert_eq!(order.user_id, "bob");
        assert_eq!(order.symbol, "PEPE");
        assert_eq!(order.side, Side::Sell);
        assert_eq!(order.order_type, OrderType::Market);
        assert_eq!(order.quantity, dec!(25));
        assert_eq!(order.price, dec!(4));
        assert_eq!(order.market, meme_market());

        let long = position_as_order(&Position::new("PEPE", dec!(25), dec!(4)));
        assert_eq!(long.side, Side::Buy);
        assert_eq!(long.quantity, dec!(25));
    }
}
