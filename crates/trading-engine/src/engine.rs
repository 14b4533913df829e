//! In-memory order and position registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use trading_core::error::{TradingError, TradingResult, ValidationError};
use trading_core::traits::OrderStore;
use trading_core::types::{MarketSnapshot, Order, OrderStatus, Position};

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Smallest accepted order quantity (inclusive)
    pub min_order_size: Decimal,
    /// Largest accepted order quantity (inclusive)
    pub max_order_size: Decimal,
    /// Persist before mutating, so a storage failure leaves the registry untouched
    pub strict_durability: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_order_size: dec!(0.01),
            max_order_size: dec!(100000),
            strict_durability: false,
        }
    }
}

#[derive(Default)]
struct Registry {
    orders: HashMap<String, Order>,
    positions: HashMap<String, Position>,
}

/// Thread-safe registry of open orders and current positions.
///
/// A single reader/writer lock guards both maps. Every order mutation is
/// persisted through the [`OrderStore`] while the write lock is held; no
/// network I/O happens under the lock. By default the in-memory mutation is
/// applied first and a storage failure is returned as a retryable
/// [`TradingError::Storage`] with the mutation left in place. With
/// `strict_durability` the write happens first and a failure leaves the
/// registry untouched.
pub struct TradingEngine {
    config: EngineConfig,
    store: Arc<dyn OrderStore>,
    state: RwLock<Registry>,
}

impl TradingEngine {
    /// Create a new engine.
    pub fn new(config: EngineConfig, store: Arc<dyn OrderStore>) -> Self {
        Self {
            config,
            store,
            state: RwLock::new(Registry::default()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Check the order quantity against the configured size bounds.
    pub fn validate_order(&self, order: &Order) -> Result<(), ValidationError> {
        if order.quantity < self.config.min_order_size {
            return Err(ValidationError::OrderTooSmall {
                quantity: order.quantity,
                min: self.config.min_order_size,
            });
        }
        if order.quantity > self.config.max_order_size {
            return Err(ValidationError::OrderTooLarge {
                quantity: order.quantity,
                max: self.config.max_order_size,
            });
        }
        Ok(())
    }

    /// Accept a new order. An existing order with the same ID is replaced.
    pub fn place_order(&self, mut order: Order) -> TradingResult<()> {
        self.validate_order(&order)?;

        order.status = OrderStatus::New;
        order.filled_quantity = Decimal::ZERO;

        let mut state = self.state.write();
        self.commit(&order, || {
            debug!(order_id = %order.id, symbol = %order.symbol, side = %order.side, quantity = %order.quantity, "Order placed");
            state.orders.insert(order.id.clone(), order.clone());
        })
    }

    /// Cancel an open order and drop it from the registry.
    ///
    /// Canceling an ID that is no longer open (including one canceled earlier)
    /// fails with [`TradingError::NotFound`].
    pub fn cancel_order(&self, order_id: &str) -> TradingResult<Order> {
        let mut state = self.state.write();
        let mut order = state
            .orders
            .get(order_id)
            .cloned()
            .ok_or_else(|| TradingError::NotFound(order_id.to_string()))?;

        order.transition(OrderStatus::Canceled);
        self.commit(&order, || {
            debug!(order_id, "Order canceled");
            state.orders.remove(order_id);
        })?;

        Ok(order)
    }

    /// Record an execution against an open order and update the symbol's position.
    ///
    /// Fully filled orders leave the registry; the position keeps its realized
    /// P&L even once flat.
    pub fn fill_order(&self, order_id: &str, quantity: Decimal, price: Decimal) -> TradingResult<Order> {
        let mut state = self.state.write();
        let mut order = state
            .orders
            .get(order_id)
            .cloned()
            .ok_or_else(|| TradingError::NotFound(order_id.to_string()))?;

        order.record_fill(quantity)?;

        self.commit(&order, || {
            let position = state
                .positions
                .entry(order.symbol.clone())
                .or_insert_with(|| {
                    Position::new(&order.symbol, Decimal::ZERO, Decimal::ZERO)
                        .with_user(&order.user_id)
                        .with_market(order.market.clone())
                });
            let realized = position.apply_fill(order.side, quantity, price);

            debug!(
                order_id,
                symbol = %order.symbol,
                filled = %order.filled_quantity,
                status = %order.status,
                realized = %realized,
                "Order filled"
            );

            if order.status.is_terminal() {
                state.orders.remove(order_id);
            } else {
                state.orders.insert(order.id.clone(), order.clone());
            }
        })?;

        Ok(order)
    }

    /// Get an open order by ID.
    pub fn get_order(&self, order_id: &str) -> TradingResult<Order> {
        self.state
            .read()
            .orders
            .get(order_id)
            .cloned()
            .ok_or_else(|| TradingError::NotFound(order_id.to_string()))
    }

    /// All open orders for a user, in no particular order.
    pub fn get_orders(&self, user_id: &str) -> Vec<Order> {
        self.state
            .read()
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn get_position(&self, symbol: &str) -> Option<Position> {
        self.state.read().positions.get(symbol).cloned()
    }

    pub fn get_positions(&self) -> Vec<Position> {
        self.state.read().positions.values().cloned().collect()
    }

    /// Mark a position to the snapshot price and take its market context.
    /// Returns the updated position, or `None` if no position exists for the symbol.
    pub fn apply_market_snapshot(&self, snapshot: &MarketSnapshot) -> Option<Position> {
        let mut state = self.state.write();
        let position = state.positions.get_mut(&snapshot.symbol)?;
        position.apply_snapshot(snapshot);
        Some(position.clone())
    }

    pub fn open_order_count(&self) -> usize {
        self.state.read().orders.len()
    }

    /// Persist `order` and apply `mutate`, in the order the durability mode requires.
    fn commit(&self, order: &Order, mutate: impl FnOnce()) -> TradingResult<()> {
        if self.config.strict_durability {
            self.store.save_order(order).map_err(|e| {
                warn!(order_id = %order.id, error = %e, "Failed to persist order, registry unchanged");
                e
            })?;
            mutate();
            return Ok(());
        }

        mutate();
        self.store.save_order(order).map_err(|e| {
            warn!(order_id = %order.id, error = %e, "Failed to persist order, registry already updated");
            TradingError::from(e)
        })
    }
}
