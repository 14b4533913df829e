//! Position types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{MarketContext, MarketSnapshot, Side};

/// A position in a single symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub user_id: String,
    pub symbol: String,
    /// Signed quantity (positive for long, negative for short)
    pub quantity: Decimal,
    /// Average entry price
    pub avg_price: Decimal,
    /// Last mark price, if one has been observed
    #[serde(default)]
    pub mark_price: Option<Decimal>,
    #[serde(default)]
    pub unrealized_pnl: Decimal,
    /// Realized profit/loss from closed portions
    #[serde(default)]
    pub realized_pnl: Decimal,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub market: MarketContext,
}

impl Position {
    /// Create a new position.
    pub fn new(symbol: impl Into<String>, quantity: Decimal, avg_price: Decimal) -> Self {
        Self {
            user_id: String::new(),
            symbol: symbol.into(),
            quantity,
            avg_price,
            mark_price: None,
            unrealized_pnl: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
            updated_at: Utc::now(),
            market: MarketContext::default(),
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_market(mut self, market: MarketContext) -> Self {
        self.market = market;
        self
    }

    pub fn is_long(&self) -> bool {
        self.quantity > Decimal::ZERO
    }

    pub fn is_short(&self) -> bool {
        self.quantity < Decimal::ZERO
    }

    pub fn is_flat(&self) -> bool {
        self.quantity == Decimal::ZERO
    }

    /// `|quantity × avg_price|`, saturating at `Decimal::MAX`.
    pub fn notional(&self) -> Decimal {
        self.quantity.saturating_mul(self.avg_price).abs()
    }

    /// Recompute unrealized P&L from the last mark price.
    pub fn refresh_pnl(&mut self) {
        if let Some(price) = self.mark_price {
            self.unrealized_pnl = price
                .saturating_sub(self.avg_price)
                .saturating_mul(self.quantity);
        }
    }

    /// Update the mark price and recalculate unrealized P&L.
    pub fn mark(&mut self, price: Decimal) {
        self.mark_price = Some(price);
        self.refresh_pnl();
        self.updated_at = Utc::now();
    }

    /// Take price and market context from a feed snapshot.
    pub fn apply_snapshot(&mut self, snapshot: &MarketSnapshot) {
        self.market = snapshot.context.clone();
        self.mark(snapshot.price);
    }

    /// Apply a fill to the position.
    /// Returns the realized P&L if the position is being reduced.
    ///
    /// Arithmetic saturates instead of overflowing. If the new average price
    /// cannot be represented, the fill price is taken as the average.
    pub fn apply_fill(&mut self, side: Side, quantity: Decimal, price: Decimal) -> Decimal {
        let fill_qty = side.sign() * quantity;
        let mut realized = Decimal::ZERO;

        let same_direction = (self.is_long() && fill_qty > Decimal::ZERO)
            || (self.is_short() && fill_qty < Decimal::ZERO);

        if same_direction || self.is_flat() {
            let total_cost = self
                .quantity
                .saturating_mul(self.avg_price)
                .saturating_add(fill_qty.saturating_mul(price));
            let new_quantity = self.quantity.saturating_add(fill_qty);

            if new_quantity != Decimal::ZERO {
                self.avg_price = total_cost.checked_div(new_quantity).unwrap_or(price);
            }
            self.quantity = new_quantity;
        } else {
            // Reducing or reversing
            let close_qty = fill_qty.abs().min(self.quantity.abs());

            realized = if self.is_long() {
                close_qty.saturating_mul(price.saturating_sub(self.avg_price))
            } else {
                close_qty.saturating_mul(self.avg_price.saturating_sub(price))
            };
            self.realized_pnl = self.realized_pnl.saturating_add(realized);

            let remaining = fill_qty.abs() - close_qty;
            if remaining > Decimal::ZERO {
                self.quantity = side.sign() * remaining;
                self.avg_price = price;
            } else {
                self.quantity = self.quantity.saturating_add(fill_qty);
            }
        }

        if self.mark_price.is_none() {
            self.mark_price = Some(price);
        }
        self.refresh_pnl();
        self.updated_at = Utc::now();

        realized
    }
}
