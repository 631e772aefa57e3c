//! Risk types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Symbol used for account-wide alerts
pub const PORTFOLIO_SYMBOL: &str = "PORTFOLIO";

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// A threshold breach raised by the risk manager
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAlert {
    /// Offending symbol, or "PORTFOLIO" for account-wide alerts
    pub symbol: String,
    /// Alert category (e.g. "Position Concentration")
    pub risk_type: String,
    pub level: RiskLevel,
    pub message: String,
    /// Observed value that tripped the threshold
    pub value: f64,
    pub threshold: f64,
    pub timestamp: DateTime<Utc>,
    pub action_required: bool,
}

/// Risk metrics for a single position
///
/// Recomputed in full on every analysis call, never updated incrementally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionRisk {
    pub symbol: String,
    /// Signed share count
    pub position_size: Decimal,
    pub market_value: Decimal,
    /// |market value| relative to net liquidation
    pub portfolio_weight: f64,
    /// 1-day 95% value at risk in account currency (usually negative)
    pub var_1d: f64,
    /// 5-day VaR: sqrt(5) scaling of the 1-day figure
    pub var_5d: f64,
    /// Fixed at 1.0 pending a market-index feed
    pub beta: f64,
    /// Annualized volatility of daily returns
    pub volatility: f64,
    /// Composite score in [0, 100]; higher is riskier
    pub risk_score: f64,
}

/// Portfolio-level risk metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub total_value: f64,
    pub total_unrealized_pnl: f64,
    pub max_position_weight: f64,
    /// Weight-weighted sum of position volatilities
    pub portfolio_volatility: f64,
    pub var_1d: f64,
    pub var_5d: f64,
    pub num_positions: usize,
    /// min(1, positions / 20)
    pub diversification_ratio: f64,
    /// (net liquidation - buying power) / net liquidation
    pub margin_utilization: f64,
    pub return_on_equity: f64,
}

/// Configurable risk thresholds
#[derive(Debug, Clone, Deserialize)]
pub struct RiskLimits {
    /// Maximum single-position weight
    pub max_position_weight: f64,
    /// Maximum annualized portfolio volatility
    pub max_portfolio_volatility: f64,
    /// Maximum 1-day VaR as a fraction of total value
    pub max_daily_var: f64,
    /// Maximum margin utilization
    pub margin_utilization_max: f64,
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            max_position_weight: 0.15,
            max_portfolio_volatility: 0.20,
            max_daily_var: 0.02,
            margin_utilization_max: 0.8,
        }
    }
}

/// Full result of one risk analysis pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub position_risks: Vec<PositionRisk>,
    pub portfolio: PortfolioMetrics,
    /// Most recent alerts within the retention window (up to 10)
    pub alerts: Vec<RiskAlert>,
    /// Overall portfolio risk score in [0, 100]
    pub risk_score: f64,
    /// Actionable recommendations, most specific first (up to 10)
    pub recommendations: Vec<String>,
}

/// Outcome of `RiskManager::analyze`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RiskReport {
    /// The account holds no positions; nothing to analyze
    NoPositions,
    Analyzed(RiskAnalysis),
}
