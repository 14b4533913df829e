//! Account-level risk metrics.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate risk view of an account, derived from its positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub user_id: String,
    pub total_equity: Decimal,
    pub peak_equity: Decimal,
    pub used_margin: Decimal,
    pub available_margin: Decimal,
    /// Total equity over used margin, in percent. Zero when no margin is used.
    pub margin_level: Decimal,
    pub daily_pnl: Decimal,
    /// Sum of absolute position notionals
    pub total_exposure: Decimal,
    /// Largest absolute position quantity
    pub max_position_size: Decimal,
    pub update_time: DateTime<Utc>,
}

impl RiskMetrics {
    /// All-zero metrics stamped with the current time.
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            total_equity: Decimal::ZERO,
            peak_equity: Decimal::ZERO,
            used_margin: Decimal::ZERO,
            available_margin: Decimal::ZERO,
            margin_level: Decimal::ZERO,
            daily_pnl: Decimal::ZERO,
            total_exposure: Decimal::ZERO,
            max_position_size: Decimal::ZERO,
            update_time: Utc::now(),
        }
    }
}
