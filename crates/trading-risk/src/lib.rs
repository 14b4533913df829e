//! Risk management for trading.
//!
//! Provides mode-scoped risk limits, order/position/account risk checks and
//! the HTTP client for the external AI risk-scoring service.

mod ai_client;
mod limits;
mod risk_manager;

pub use ai_client::{AiClientConfig, AiRiskClient, DisabledScorer, DEFAULT_AI_BASE_URL};
pub use limits::{DexLimits, Limits, ModeLimits, PumpFunLimits};
pub use risk_manager::{RiskManager, AI_SCORE_THRESHOLD, DEFAULT_SCORE_TIMEOUT};
