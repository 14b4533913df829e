//! Plain-text and JSON risk reports.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;
use trading_core::error::RiskLimitError;
use trading_core::types::{Position, RiskMetrics, TradingMode};

/// One position row in a report.
#[derive(Debug, Clone, Serialize)]
pub struct PositionLine {
    pub symbol: String,
    pub quantity: Decimal,
    pub avg_price: Decimal,
    pub mark_price: Option<Decimal>,
    pub unrealized_pnl: Decimal,
    /// Name of the failed check, if any
    pub check: Option<&'static str>,
    pub reason: Option<String>,
}

/// Account metrics plus per-position risk outcomes.
#[derive(Debug, Clone, Serialize)]
pub struct RiskReport {
    pub mode: TradingMode,
    pub metrics: RiskMetrics,
    pub account_check: Option<&'static str>,
    pub account_reason: Option<String>,
    pub positions: Vec<PositionLine>,
}

impl RiskReport {
    pub fn new(mode: TradingMode, metrics: RiskMetrics) -> Self {
        Self {
            mode,
            metrics,
            account_check: None,
            account_reason: None,
            positions: Vec::new(),
        }
    }

    pub fn with_account_outcome(mut self, outcome: &Result<(), RiskLimitError>) -> Self {
        if let Err(breach) = outcome {
            self.account_check = Some(breach.check());
            self.account_reason = Some(breach.to_string());
        }
        self
    }

    pub fn add_position(&mut self, position: &Position, outcome: &Result<(), RiskLimitError>) {
        let (check, reason) = match outcome {
            Ok(()) => (None, None),
            Err(breach) => (Some(breach.check()), Some(breach.to_string())),
        };
        self.positions.push(PositionLine {
            symbol: position.symbol.clone(),
            quantity: position.quantity,
            avg_price: position.avg_price,
            mark_price: position.mark_price,
            unrealized_pnl: position.unrealized_pnl,
            check,
            reason,
        });
    }

    /// Number of failed checks across the account and its positions.
    pub fn breach_count(&self) -> usize {
        let positions = self.positions.iter().filter(|p| p.check.is_some()).count();
        positions + usize::from(self.account_check.is_some())
    }

    pub fn is_clean(&self) -> bool {
        self.breach_count() == 0
    }
}

impl fmt::Display for RiskReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.metrics;
        writeln!(f, "Risk report ({})", self.mode)?;
        writeln!(f, "  Equity:           {}", m.total_equity.round_dp(2))?;
        writeln!(f, "  Exposure:         {}", m.total_exposure.round_dp(2))?;
        writeln!(f, "  Used margin:      {}", m.used_margin.round_dp(2))?;
        writeln!(f, "  Available margin: {}", m.available_margin.round_dp(2))?;
        writeln!(f, "  Margin level:     {}%", m.margin_level.round_dp(2))?;
        writeln!(f, "  Daily P&L:        {}", m.daily_pnl.round_dp(2))?;
        match &self.account_reason {
            Some(reason) => writeln!(f, "  Account:          BREACH ({})", reason)?,
            None => writeln!(f, "  Account:          ok")?,
        }

        if self.positions.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(
            f,
            "  {:<14} {:>12} {:>12} {:>12} {:>12}  {}",
            "SYMBOL", "QTY", "AVG", "MARK", "UPNL", "STATUS"
        )?;
        for line in &self.positions {
            let mark = line
                .mark_price
                .map(|p| p.round_dp(4).to_string())
                .unwrap_or_else(|| "-".to_string());
            let status = line.reason.as_deref().unwrap_or("ok");
            writeln!(
                f,
                "  {:<14} {:>12} {:>12} {:>12} {:>12}  {}",
                line.symbol,
                line.quantity.to_string(),
                line.avg_price.round_dp(4).to_string(),
                mark,
                line.unrealized_pnl.round_dp(2).to_string(),
                status
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn metrics() -> RiskMetrics {
        let mut m = RiskMetrics::empty("alice");
        m.total_equity = dec!(700);
        m.used_margin = dec!(100);
        m.margin_level = dec!(700);
        m
    }

    #[test]
    fn test_clean_report() {
        let mut report = RiskReport::new(TradingMode::DexSwap, metrics()).with_account_outcome(&Ok(()));
        report.add_position(&Position::new("SOL", dec!(10), dec!(100)), &Ok(()));

        assert!(report.is_clean());
        let text = report.to_string();
        assert!(text.contains("Risk report (dex_swap)"));
        assert!(text.contains("Account:          ok"));
        assert!(text.contains("SOL"));
    }

    #[test]
    fn test_breaches_are_counted_and_rendered() {
        let account = Err(RiskLimitError::DailyLossExceeded {
            daily_pnl: dec!(-1500),
            limit: dec!(1000),
        });
        let mut report = RiskReport::new(TradingMode::PumpFun, metrics()).with_account_outcome(&account);
        report.add_position(
            &Position::new("WIF", dec!(5), dec!(2)),
            &Err(RiskLimitError::TooFewHolders { holders: 12, min: 100 }),
        );
        report.add_position(&Position::new("BONK", dec!(1), dec!(1)), &Ok(()));

        assert_eq!(report.breach_count(), 2);
        assert_eq!(report.positions[0].check, Some("holders"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "pump_fun");
        assert_eq!(json["account_check"], "daily_loss");
        assert!(report.to_string().contains("BREACH"));
    }
}
