//! Position risk check command.

use anyhow::Result;
use trading_config::AppConfig;
use trading_core::types::Position;
use trading_monitor::RiskReport;

use super::{build_risk_manager, interrupted, read_json};
use crate::cli::{CheckPositionArgs, OutputFormat};

pub async fn run(args: CheckPositionArgs, config: &AppConfig) -> Result<()> {
    let mut position: Position = read_json(&args.position)?;
    position.refresh_pnl();

    let risk = build_risk_manager(config)?;
    let outcome = risk.check_position_risk_until(&position, interrupted()).await;

    let metrics = risk.calculate_metrics(std::slice::from_ref(&position));
    let mut report = RiskReport::new(risk.mode(), metrics);
    report.add_position(&position, &outcome);

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", report),
    }

    if let Err(breach) = outcome {
        anyhow::bail!("position {} breaches {} limit", position.symbol, breach.check());
    }
    Ok(())
}
