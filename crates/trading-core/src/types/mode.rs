//! Trading mode selection.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which sublimit group applies to risk checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TradingMode {
    /// Swaps routed through DEX liquidity pools
    #[default]
    DexSwap,
    /// High-volatility meme tokens launched on bonding curves
    PumpFun,
}

impl TradingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradingMode::DexSwap => "dex_swap",
            TradingMode::PumpFun => "pump_fun",
        }
    }
}

impl std::fmt::Display for TradingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dex_swap" | "dex" => Ok(TradingMode::DexSwap),
            "pump_fun" | "pumpfun" | "meme" => Ok(TradingMode::PumpFun),
            other => Err(format!("unknown trading mode: {}", other)),
        }
    }
}
