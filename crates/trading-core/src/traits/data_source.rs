//! Market data source trait.

use crate::error::MarketDataError;
use crate::types::MarketSnapshot;
use async_trait::async_trait;

/// Supplier of live prices and DEX/meme-token market fields.
///
/// The core never fetches market data itself; callers pull snapshots from a
/// source and hand them to the engine before running risk checks.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Latest price and market context for a symbol.
    async fn snapshot(&self, symbol: &str) -> Result<MarketSnapshot, MarketDataError>;

    /// Snapshots for several symbols. Symbols the source cannot price are skipped.
    async fn snapshots(&self, symbols: &[String]) -> Vec<MarketSnapshot> {
        let mut out = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            if let Ok(snapshot) = self.snapshot(symbol).await {
                out.push(snapshot);
            }
        }
        out
    }

    /// Get the source name.
    fn name(&self) -> &str;
}
