//! Collaborator traits the trading core calls out to.

mod data_source;
mod scorer;
mod store;

pub use data_source::MarketDataSource;
pub use scorer::RiskScorer;
pub use store::OrderStore;
