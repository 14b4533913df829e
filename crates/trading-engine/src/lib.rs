//! Trading engine: the authoritative registry of open orders and positions.

mod engine;
mod gateway;
mod store;

pub use engine::{EngineConfig, TradingEngine};
pub use gateway::{PositionReview, RiskGatedEngine};
pub use store::{JsonlOrderStore, MemoryOrderStore};
