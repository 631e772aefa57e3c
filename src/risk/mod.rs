//! Risk management module
//!
//! Position and portfolio risk metrics, alerting and recommendations

mod alerts;
mod manager;
mod types;

pub use alerts::AlertLog;
pub use manager::RiskManager;
pub use types::{
    PortfolioMetrics, PositionRisk, RiskAlert, RiskAnalysis, RiskLevel, RiskLimits, RiskReport,
    PORTFOLIO_SYMBOL,
};
