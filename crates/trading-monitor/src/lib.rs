//! Logging and risk reporting.

mod logging;
mod report;

pub use logging::setup_logging;
pub use report::{PositionLine, RiskReport};
