//! Portfolio snapshot module
//!
//! Current positions and account summary from an external account source

mod snapshot;

pub use snapshot::SnapshotFile;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Account summary tags the risk manager relies on
pub const NET_LIQUIDATION: &str = "NetLiquidation";
pub const TOTAL_CASH_VALUE: &str = "TotalCashValue";
pub const BUYING_POWER: &str = "BuyingPower";
pub const UNREALIZED_PNL: &str = "UnrealizedPnL";

/// A single held position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioPosition {
    #[serde(rename = "Symbol")]
    pub symbol: String,
    /// Security type (e.g. "STK")
    #[serde(rename = "SecType")]
    pub sec_type: String,
    /// Signed share count
    #[serde(rename = "Position")]
    pub quantity: Decimal,
    #[serde(rename = "Market Value")]
    pub market_value: Decimal,
    #[serde(rename = "Average Cost")]
    pub average_cost: Decimal,
    #[serde(rename = "Unrealized PnL")]
    pub unrealized_pnl: Decimal,
}

/// One tagged account summary value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountValue {
    pub value: String,
    #[serde(default)]
    pub currency: String,
}

/// Account summary keyed by tag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountSummary(pub HashMap<String, AccountValue>);

impl AccountSummary {
    /// Look up a tag's raw entry
    pub fn get(&self, tag: &str) -> Option<&AccountValue> {
        self.0.get(tag)
    }

    /// Parse a tag's value as a decimal amount
    pub fn amount(&self, tag: &str) -> Option<Decimal> {
        self.0
            .get(tag)
            .and_then(|v| Decimal::from_str(v.value.trim()).ok())
    }

    /// Parse a tag's value as f64 for statistical math
    pub fn amount_f64(&self, tag: &str) -> Option<f64> {
        self.0.get(tag).and_then(|v| v.value.trim().parse().ok())
    }
}

/// Trait for portfolio snapshot provider implementations
#[async_trait]
pub trait PortfolioProvider: Send + Sync {
    /// Current positions; empty when flat
    async fn get_positions(&self) -> anyhow::Result<Vec<PortfolioPosition>>;

    /// Account summary fields keyed by tag
    async fn get_account_summary(&self) -> anyhow::Result<AccountSummary>;
}
