//! Risk limit configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use trading_core::types::TradingMode;

/// Sublimits for swaps routed through DEX pools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DexLimits {
    /// Maximum tolerated slippage, as a fraction
    pub max_slippage: Decimal,
    /// Minimum pool liquidity
    pub min_liquidity: Decimal,
    /// Maximum price impact, as a fraction
    pub max_impact: Decimal,
    /// Maximum spread, as a fraction
    pub max_spread: Decimal,
    /// Minimum pool size
    pub min_pool_size: Decimal,
}

impl Default for DexLimits {
    fn default() -> Self {
        Self {
            max_slippage: dec!(0.01),
            min_liquidity: dec!(100000),
            max_impact: dec!(0.02),
            max_spread: dec!(0.005),
            min_pool_size: dec!(50000),
        }
    }
}

/// Sublimits for meme tokens trading on pump.fun style bonding curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PumpFunLimits {
    pub min_market_cap: Decimal,
    pub min_volume: Decimal,
    pub min_holders: u64,
    /// Maximum volatility, as a fraction
    pub max_volatility: Decimal,
    pub min_social_score: Decimal,
}

impl Default for PumpFunLimits {
    fn default() -> Self {
        Self {
            min_market_cap: dec!(100000),
            min_volume: dec!(10000),
            min_holders: 100,
            max_volatility: dec!(0.5),
            min_social_score: dec!(0.3),
        }
    }
}

/// Base limits plus both mode sublimit groups, as loaded from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_position_size: Decimal,
    /// Maximum unrealized loss as a fraction of position notional
    pub max_drawdown: Decimal,
    pub max_daily_loss: Decimal,
    pub max_leverage: Decimal,
    /// Minimum margin level, in percent
    pub min_margin_level: Decimal,
    pub max_concentration: Decimal,
    #[serde(alias = "dex_limits")]
    pub dex: DexLimits,
    #[serde(alias = "pump_fun_limits")]
    pub pump_fun: PumpFunLimits,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_position_size: dec!(1000),
            max_drawdown: dec!(0.2),
            max_daily_loss: dec!(1000),
            max_leverage: dec!(3),
            min_margin_level: dec!(150),
            max_concentration: dec!(0.25),
            dex: DexLimits::default(),
            pump_fun: PumpFunLimits::default(),
        }
    }
}

impl Limits {
    /// The sublimit group that applies in `mode`.
    pub fn for_mode(&self, mode: TradingMode) -> ModeLimits {
        match mode {
            TradingMode::DexSwap => ModeLimits::Dex(self.dex.clone()),
            TradingMode::PumpFun => ModeLimits::PumpFun(self.pump_fun.clone()),
        }
    }

    /// Names of limits holding negative values.
    pub fn negative_fields(&self) -> Vec<&'static str> {
        let fields = [
            ("max_position_size", self.max_position_size),
            ("max_drawdown", self.max_drawdown),
            ("max_daily_loss", self.max_daily_loss),
            ("max_leverage", self.max_leverage),
            ("min_margin_level", self.min_margin_level),
            ("max_concentration", self.max_concentration),
            ("dex.max_slippage", self.dex.max_slippage),
            ("dex.min_liquidity", self.dex.min_liquidity),
            ("dex.max_impact", self.dex.max_impact),
            ("dex.max_spread", self.dex.max_spread),
            ("dex.min_pool_size", self.dex.min_pool_size),
            ("pump_fun.min_market_cap", self.pump_fun.min_market_cap),
            ("pump_fun.min_volume", self.pump_fun.min_volume),
            ("pump_fun.max_volatility", self.pump_fun.max_volatility),
            ("pump_fun.min_social_score", self.pump_fun.min_social_score),
        ];
        fields
            .into_iter()
            .filter(|(_, value)| *value < Decimal::ZERO)
            .map(|(name, _)| name)
            .collect()
    }
}

/// The one active sublimit group held by a risk manager.
#[derive(Debug, Clone, PartialEq)]
pub enum ModeLimits {
    Dex(DexLimits),
    PumpFun(PumpFunLimits),
}

impl ModeLimits {
    pub fn mode(&self) -> TradingMode {
        match self {
            ModeLimits::Dex(_) => TradingMode::DexSwap,
            ModeLimits::PumpFun(_) => TradingMode::PumpFun,
        }
    }
}
