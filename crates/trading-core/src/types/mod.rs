//! Core data types for the trading system.

mod market;
mod metrics;
mod mode;
mod order;
mod position;

pub use market::{MarketContext, MarketSnapshot};
pub use metrics::RiskMetrics;
pub use mode::TradingMode;
pub use order::{Order, OrderStatus, OrderType, Side};
pub use position::Position;
