//! Market context captured from DEX and meme-token feeds.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Live market fields attached to orders and positions before risk evaluation.
///
/// DEX feeds populate slippage, price impact, spread and pool size; meme-token
/// feeds populate market cap, volume, holders, volatility and social score.
/// Fields a feed does not supply stay at zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketContext {
    /// Expected vs executed price difference, as a fraction
    pub slippage: Decimal,
    /// Estimated price movement caused by the order itself
    pub price_impact: Decimal,
    /// Bid/ask spread, as a fraction
    pub spread: Decimal,
    /// Liquidity pool size in quote currency
    pub pool_size: Decimal,
    /// Token market capitalisation
    pub market_cap: Decimal,
    /// Trading volume over the feed's window
    pub volume: Decimal,
    /// Number of token holders
    pub holders: u64,
    /// Price volatility, as a fraction
    pub volatility: Decimal,
    /// Social sentiment score
    pub social_score: Decimal,
}

/// A priced market observation for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub symbol: String,
    pub price: Decimal,
    #[serde(flatten)]
    pub context: MarketContext,
}

impl MarketSnapshot {
    pub fn new(symbol: impl Into<String>, price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            context: MarketContext::default(),
        }
    }

    pub fn with_context(mut self, context: MarketContext) -> Self {
        self.context = context;
        self
    }
}
