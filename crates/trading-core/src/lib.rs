//! Core types and traits for the trading system.
//!
//! This crate provides the foundational building blocks including:
//! - Order, position and account risk types
//! - Market context captured from DEX and meme-token feeds
//! - Collaborator traits for order storage, AI risk scoring and market data

pub mod types;
pub mod traits;
pub mod error;

pub use error::{TradingError, TradingResult};
pub use types::*;
pub use traits::*;
