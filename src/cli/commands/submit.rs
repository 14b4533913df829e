//! Submit command implementation.

use anyhow::Result;
use tracing::info;
use trading_config::AppConfig;
use trading_core::types::Order;
use trading_core::TradingError;

use super::{build_gateway, interrupted, read_json};
use crate::cli::{OutputFormat, SubmitArgs};

pub async fn run(args: SubmitArgs, config: &AppConfig) -> Result<()> {
    let order: Order = read_json(&args.order)?;
    let order_id = order.id.clone();
    info!(order_id = %order_id, symbol = %order.symbol, mode = %config.risk.mode, "Submitting order");

    let gateway = build_gateway(config)?;

    match gateway.submit_until(order, interrupted()).await {
        Ok(()) => {
            let placed = gateway.engine().get_order(&order_id)?;
            match args.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&placed)?),
                OutputFormat::Text => println!(
                    "Accepted {} {} {} {} @ {} (status {})",
                    placed.id,
                    placed.side,
                    placed.quantity,
                    placed.symbol,
                    placed.price,
                    placed.status
                ),
            }
            Ok(())
        }
        Err(TradingError::RiskLimit(breach)) => {
            match args.output {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({
                        "order_id": order_id,
                        "accepted": false,
                        "check": breach.check(),
                        "reason": breach.to_string(),
                    })
                ),
                OutputFormat::Text => println!("Rejected {}: {}", order_id, breach),
            }
            anyhow::bail!("order {} rejected by {} check", order_id, breach.check())
        }
        Err(e) => Err(e.into()),
    }
}
