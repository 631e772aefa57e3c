//! File-backed portfolio snapshots
//!
//! Reads the JSON layout written by the account exporter:
//! `{"account_summary": {tag: {value, currency}}, "positions": [...]}`.
//! The file is re-read on every call so a refreshed export is picked up
//! without restarting.

use super::{AccountSummary, AccountValue, PortfolioPosition, PortfolioProvider};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Portfolio provider backed by an exported snapshot file
pub struct SnapshotFile {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    #[serde(default)]
    account_summary: HashMap<String, AccountValue>,
    #[serde(default)]
    positions: Vec<PortfolioPosition>,
}

impl SnapshotFile {
    /// Create a provider reading from the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> anyhow::Result<Snapshot> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let snapshot = serde_json::from_str(&content)?;
        Ok(snapshot)
    }
}

#[async_trait]
impl PortfolioProvider for SnapshotFile {
    async fn get_positions(&self) -> anyhow::Result<Vec<PortfolioPosition>> {
        let snapshot = self.load().await?;
        tracing::debug!(
            path = %self.path.display(),
            positions = snapshot.positions.len(),
            "Loaded portfolio snapshot"
        );
        Ok(snapshot.positions)
    }

    async fn get_account_summary(&self) -> anyhow::Result<AccountSummary> {
        let snapshot = self.load().await?;
        Ok(AccountSummary(snapshot.account_summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::NET_LIQUIDATION;
    use rust_decimal_macros::dec;
    use std::io::Write;

    const SNAPSHOT: &str = r#"{
        "timestamp": "2026-08-06T14:30:00Z",
        "account_summary": {
            "NetLiquidation": {"value": "100000", "currency": "USD"},
            "BuyingPower": {"value": "52000", "currency": "USD"}
        },
        "positions": [
            {
                "Symbol": "AAPL",
                "SecType": "STK",
                "Position": 100,
                "Market Value": 18500.0,
                "Average Cost": 170.25,
                "Unrealized PnL": 1475.0
            }
        ]
    }"#;

    #[tokio::test]
    async fn test_reads_exported_snapshot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();

        let provider = SnapshotFile::new(file.path());
        let positions = provider.get_positions().await.unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].symbol, "AAPL");
        assert_eq!(positions[0].market_value, dec!(18500.0));

        let summary = provider.get_account_summary().await.unwrap();
        assert_eq!(summary.amount(NET_LIQUIDATION), Some(dec!(100000)));
    }

    #[tokio::test]
    async fn test_missing_file_errors() {
        let provider = SnapshotFile::new("/nonexistent/snapshot.json");
        assert!(provider.get_positions().await.is_err());
    }

    #[tokio::test]
    async fn test_empty_sections_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{}").unwrap();

        let provider = SnapshotFile::new(file.path());
        assert!(provider.get_positions().await.unwrap().is_empty());
        assert!(provider
            .get_account_summary()
            .await
            .unwrap()
            .0
            .is_empty());
    }
}
