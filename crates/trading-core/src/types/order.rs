//! Order types and structures.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MarketContext;
use crate::error::ValidationError;

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Get the sign for position calculations (+1 for buy, -1 for sell).
    pub fn sign(&self) -> Decimal {
        match self {
            Side::Buy => Decimal::ONE,
            Side::Sell => -Decimal::ONE,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Market order - execute immediately at best available price
    #[default]
    Market,
    /// Limit order - execute at specified price or better
    Limit,
    /// Stop order - becomes market order when stop price is reached
    Stop,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderType::Market => write!(f, "MARKET"),
            OrderType::Limit => write!(f, "LIMIT"),
            OrderType::Stop => write!(f, "STOP"),
        }
    }
}

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Accepted into the engine, nothing filled yet
    #[default]
    New,
    /// Order partially filled
    Partial,
    /// Order completely filled
    Filled,
    /// Order canceled
    Canceled,
    /// Order rejected
    Rejected,
}

impl OrderStatus {
    /// Check if the order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Canceled | OrderStatus::Rejected
        )
    }

    /// Status only moves forward: nothing returns to `New`, terminal states are final.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        match (self, next) {
            (_, OrderStatus::New) => false,
            (OrderStatus::New, _) => true,
            (OrderStatus::Partial, OrderStatus::Rejected) => false,
            (OrderStatus::Partial, _) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::New => "new",
            OrderStatus::Partial => "partial",
            OrderStatus::Filled => "filled",
            OrderStatus::Canceled => "canceled",
            OrderStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

fn new_order_id() -> String {
    Uuid::new_v4().to_string()
}

/// A trading order together with the market context captured at submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID (caller supplied; generated when absent)
    #[serde(default = "new_order_id")]
    pub id: String,
    /// Owning user
    #[serde(default)]
    pub user_id: String,
    /// Symbol traded
    pub symbol: String,
    /// Buy or sell
    pub side: Side,
    /// Type of order
    #[serde(rename = "type", default)]
    pub order_type: OrderType,
    /// Limit/reference price
    #[serde(default)]
    pub price: Decimal,
    /// Original quantity
    pub quantity: Decimal,
    /// Quantity filled so far
    #[serde(default)]
    pub filled_quantity: Decimal,
    /// Current status
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub market: MarketContext,
}

impl Order {
    /// Create a new order with a generated ID.
    pub fn new(
        user_id: impl Into<String>,
        symbol: impl Into<String>,
        side: Side,
        order_type: OrderType,
        price: Decimal,
        quantity: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_order_id(),
            user_id: user_id.into(),
            symbol: symbol.into(),
            side,
            order_type,
            price,
            quantity,
            filled_quantity: Decimal::ZERO,
            status: OrderStatus::New,
            created_at: now,
            updated_at: now,
            market: MarketContext::default(),
        }
    }

    /// Create a market order.
    pub fn market(
        user_id: impl Into<String>,
        symbol: impl Into<String>,
        side: Side,
        quantity: Decimal,
    ) -> Self {
        Self::new(user_id, symbol, side, OrderType::Market, Decimal::ZERO, quantity)
    }

    /// Create a limit order.
    pub fn limit(
        user_id: impl Into<String>,
        symbol: impl Into<String>,
        side: Side,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self::new(user_id, symbol, side, OrderType::Limit, price, quantity)
    }

    /// Use a caller-chosen ID.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Attach live market context.
    pub fn with_market(mut self, market: MarketContext) -> Self {
        self.market = market;
        self
    }

    /// Get the remaining quantity to be filled.
    pub fn remaining_quantity(&self) -> Decimal {
        self.quantity - self.filled_quantity
    }

    /// Move to `next` if the status machine allows it. Returns whether the status changed.
    pub fn transition(&mut self, next: OrderStatus) -> bool {
        if !self.status.can_transition_to(next) {
            return false;
        }
        self.status = next;
        self.updated_at = Utc::now();
        true
    }

    /// Record an execution of `quantity` against this order.
    pub fn record_fill(&mut self, quantity: Decimal) -> Result<(), ValidationError> {
        if quantity <= Decimal::ZERO {
            return Err(ValidationError::InvalidFill { quantity });
        }
        let remaining = self.remaining_quantity();
        if quantity > remaining {
            return Err(ValidationError::Overfill {
                requested: quantity,
                remaining,
            });
        }

        self.filled_quantity += quantity;
        let next = if self.filled_quantity >= self.quantity {
            OrderStatus::Filled
        } else {
            OrderStatus::Partial
        };
        self.transition(next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_market() {
        let order = Order::market("alice", "BONK", Side::Buy, dec!(100));
        assert_eq!(order.symbol, "BONK");
        assert_eq!(order.order_type, OrderType::Market);
        assert_eq!(order.status, OrderStatus::New);
        assert_eq!(order.filled_quantity, Decimal::ZERO);
        assert!(!order.id.is_empty());
    }

    #[test]
    fn test_record_fill() {
        let mut order = Order::limit("alice", "SOL", Side::Buy, dec!(10), dec!(150));

        order.record_fill(dec!(4)).unwrap();
        assert_eq!(order.status, OrderStatus::Partial);
        assert_eq!(order.remaining_quantity(), dec!(6));

        order.record_fill(dec!(6)).unwrap();
        assert_eq!(order.status, OrderStatus::Filled);
    }

    #[test]
    fn test_record_fill_rejects_overfill() {
        let mut order = Order::market("alice", "SOL", Side::Sell, dec!(5));
        let err = order.record_fill(dec!(6)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Overfill {
                requested: dec!(6),
                remaining: dec!(5)
            }
        );
        assert!(order.record_fill(dec!(0)).is_err());
        assert_eq!(order.filled_quantity, Decimal::ZERO);
    }

    #[test]
    fn test_status_is_monotonic() {
        assert!(OrderStatus::New.can_transition_to(OrderStatus::Canceled));
        assert!(OrderStatus::Partial.can_transition_to(OrderStatus::Filled));
        assert!(!OrderStatus::Partial.can_transition_to(OrderStatus::New));
        assert!(!OrderStatus::Canceled.can_transition_to(OrderStatus::Filled));
        assert!(!OrderStatus::Filled.can_transition_to(OrderStatus::Canceled));

        let mut order = Order::market("alice", "SOL", Side::Buy, dec!(1));
        assert!(order.transition(OrderStatus::Canceled));
        assert!(!order.transition(OrderStatus::New));
        assert_eq!(order.status, OrderStatus::Canceled);
    }

    #[test]
    fn test_order_json_defaults() {
        let json = r#"{
            "user_id": "bob",
            "symbol": "WIF",
            "side": "buy",
            "type": "limit",
            "price": 2.5,
            "quantity": 40,
            "market_cap": 1000000,
            "holders": 1200
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_type, OrderType::Limit);
        assert_eq!(order.quantity, dec!(40));
        assert_eq!(order.status, OrderStatus::New);
        assert_eq!(order.market.holders, 1200);
        assert_eq!(order.market.market_cap, dec!(1000000));
        assert!(!order.id.is_empty());
    }
}
