//! Error types for the trading system.

use rust_decimal::Decimal;
use thiserror::Error;

/// Top-level trading system error.
#[derive(Error, Debug)]
pub enum TradingError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Risk limit breached: {0}")]
    RiskLimit(#[from] RiskLimitError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl TradingError {
    /// Storage failures leave the mutation applied in memory; the caller may retry the write.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TradingError::Storage(_))
    }
}

/// Order bound and fill validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("order size too small: {quantity} < {min}")]
    OrderTooSmall { quantity: Decimal, min: Decimal },

    #[error("order size too large: {quantity} > {max}")]
    OrderTooLarge { quantity: Decimal, max: Decimal },

    #[error("fill quantity must be positive: {quantity}")]
    InvalidFill { quantity: Decimal },

    #[error("fill exceeds remaining quantity: {requested} > {remaining}")]
    Overfill { requested: Decimal, remaining: Decimal },
}

/// A risk check that failed, with the measured value and the limit it breached.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskLimitError {
    #[error("order size exceeds limit: {quantity} > {limit}")]
    OrderSizeExceeded { quantity: Decimal, limit: Decimal },

    #[error("position size exceeds limit: {quantity} > {limit}")]
    PositionSizeExceeded { quantity: Decimal, limit: Decimal },

    #[error("drawdown exceeds limit: {drawdown} > {limit}")]
    DrawdownExceeded { drawdown: Decimal, limit: Decimal },

    #[error("slippage too high: {slippage} > {limit}")]
    SlippageTooHigh { slippage: Decimal, limit: Decimal },

    #[error("price impact too high: {impact} > {limit}")]
    PriceImpactTooHigh { impact: Decimal, limit: Decimal },

    #[error("spread too high: {spread} > {limit}")]
    SpreadTooHigh { spread: Decimal, limit: Decimal },

    #[error("pool size too small: {pool_size} < {min}")]
    PoolSizeTooSmall { pool_size: Decimal, min: Decimal },

    #[error("market cap too low: {market_cap} < {min}")]
    MarketCapTooLow { market_cap: Decimal, min: Decimal },

    #[error("volume too low: {volume} < {min}")]
    VolumeTooLow { volume: Decimal, min: Decimal },

    #[error("holders too few: {holders} < {min}")]
    TooFewHolders { holders: u64, min: u64 },

    #[error("volatility too high: {volatility} > {limit}")]
    VolatilityTooHigh { volatility: Decimal, limit: Decimal },

    #[error("social score too low: {score} < {min}")]
    SocialScoreTooLow { score: Decimal, min: Decimal },

    #[error("position too large relative to pool: {pct}% > {limit_pct}%")]
    PoolShareExceeded { pct: Decimal, limit_pct: Decimal },

    #[error("position too large relative to market cap: {pct}% > {limit_pct}%")]
    MarketCapShareExceeded { pct: Decimal, limit_pct: Decimal },

    #[error("position too large relative to volume: {pct}% > {limit_pct}%")]
    VolumeShareExceeded { pct: Decimal, limit_pct: Decimal },

    #[error("AI risk score too high: {score} > {threshold}")]
    AiScoreTooHigh { score: f64, threshold: f64 },

    #[error("daily loss exceeds limit: {daily_pnl} < -{limit}")]
    DailyLossExceeded { daily_pnl: Decimal, limit: Decimal },

    #[error("margin level below limit: {margin_level} < {min}")]
    MarginLevelTooLow { margin_level: Decimal, min: Decimal },
}

impl RiskLimitError {
    /// Stable name of the check that failed, suitable for metrics labels and API payloads.
    pub fn check(&self) -> &'static str {
        match self {
            RiskLimitError::OrderSizeExceeded { .. } => "order_size",
            RiskLimitError::PositionSizeExceeded { .. } => "position_size",
            RiskLimitError::DrawdownExceeded { .. } => "drawdown",
            RiskLimitError::SlippageTooHigh { .. } => "slippage",
            RiskLimitError::PriceImpactTooHigh { .. } => "price_impact",
            RiskLimitError::SpreadTooHigh { .. } => "spread",
            RiskLimitError::PoolSizeTooSmall { .. } => "pool_size",
            RiskLimitError::MarketCapTooLow { .. } => "market_cap",
            RiskLimitError::VolumeTooLow { .. } => "volume",
            RiskLimitError::TooFewHolders { .. } => "holders",
            RiskLimitError::VolatilityTooHigh { .. } => "volatility",
            RiskLimitError::SocialScoreTooLow { .. } => "social_score",
            RiskLimitError::PoolShareExceeded { .. } => "pool_share",
            RiskLimitError::MarketCapShareExceeded { .. } => "market_cap_share",
            RiskLimitError::VolumeShareExceeded { .. } => "volume_share",
            RiskLimitError::AiScoreTooHigh { .. } => "ai_score",
            RiskLimitError::DailyLossExceeded { .. } => "daily_loss",
            RiskLimitError::MarginLevelTooLow { .. } => "margin_level",
        }
    }
}

/// Order persistence errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// AI risk scoring errors. Every variant means "score unavailable".
#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Failed to send request: {0}")]
    Transport(String),

    #[error("Unexpected status code: {0}")]
    Status(u16),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Risk score out of range: {0}")]
    OutOfRange(f64),

    #[error("Scoring timed out after {0} ms")]
    Timeout(u64),

    #[error("Scoring canceled")]
    Canceled,

    #[error("Scoring disabled")]
    Disabled,
}

/// Market data source errors.
#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),
}

/// Result type alias for trading operations.
pub type TradingResult<T> = Result<T, TradingError>;
