//! Account metrics command.

use anyhow::Result;
use tracing::info;
use trading_config::AppConfig;
use trading_core::types::Position;
use trading_monitor::RiskReport;

use super::{build_risk_manager, read_json};
use crate::cli::{MetricsArgs, OutputFormat};

pub async fn run(args: MetricsArgs, config: &AppConfig) -> Result<()> {
    let mut positions: Vec<Position> = read_json(&args.positions)?;
    for position in &mut positions {
        position.refresh_pnl();
    }
    info!(count = positions.len(), "Loaded positions");

    let risk = build_risk_manager(config)?;
    let metrics = risk.calculate_metrics(&positions);
    let account = risk.check_account_risk(&metrics);

    let mut report = RiskReport::new(risk.mode(), metrics).with_account_outcome(&account);
    for position in positions.iter().filter(|p| !p.is_flat()) {
        let outcome = risk.check_position_risk(position).await;
        report.add_position(position, &outcome);
    }

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", report),
    }

    if !report.is_clean() {
        anyhow::bail!("{} risk limit breach(es)", report.breach_count());
    }
    Ok(())
}
