//! Risk command implementation

use crate::config::Config;
use crate::data::{RestConfig, RestMarketData};
use crate::portfolio::SnapshotFile;
use crate::risk::{RiskLevel, RiskManager, RiskReport};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct RiskArgs {
    /// Path to an exported portfolio snapshot JSON
    #[arg(short, long, default_value = "portfolio_snapshot.json")]
    pub snapshot: PathBuf,
}

impl RiskArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let portfolio = Arc::new(SnapshotFile::new(&self.snapshot));
        let market_data = Arc::new(RestMarketData::new(RestConfig {
            base_url: config.data.base_url.clone(),
            lookback_days: config.data.lookback_days,
            timeout: Duration::from_secs(config.data.request_timeout_secs),
        }));

        let mut manager =
            RiskManager::new(portfolio, market_data).with_limits(config.risk.clone());

        let analysis = match manager.analyze().await? {
            RiskReport::NoPositions => {
                println!("No positions to analyze");
                return Ok(());
            }
            RiskReport::Analyzed(analysis) => analysis,
        };

        println!("Portfolio risk score: {:.1}/100", analysis.risk_score);
        println!(
            "Total value: ${:.0}  volatility: {:.1}%  VaR(1d): ${:.0}  margin: {:.1}%",
            analysis.portfolio.total_value,
            analysis.portfolio.portfolio_volatility * 100.0,
            analysis.portfolio.var_1d,
            analysis.portfolio.margin_utilization * 100.0
        );

        println!("\nPositions:");
        for risk in &analysis.position_risks {
            println!(
                "  {:<6} weight {:>5.1}%  vol {:>5.1}%  VaR(1d) {:>10.2}  score {:>5.1}",
                risk.symbol,
                risk.portfolio_weight * 100.0,
                risk.volatility * 100.0,
                risk.var_1d,
                risk.risk_score
            );
        }

        if !analysis.alerts.is_empty() {
            println!("\nActive alerts: {}", analysis.alerts.len());
            for alert in &analysis.alerts {
                let marker = match alert.level {
                    RiskLevel::Low => "LOW ",
                    RiskLevel::Medium => "MED ",
                    RiskLevel::High => "HIGH",
                    RiskLevel::Critical => "CRIT",
                };
                println!("  [{}] {}: {}", marker, alert.symbol, alert.message);
            }
        }

        if !analysis.recommendations.is_empty() {
            println!("\nRecommendations:");
            for (i, recommendation) in analysis.recommendations.iter().enumerate() {
                println!("  {}. {}", i + 1, recommendation);
            }
        }

        Ok(())
    }
}
