//! Engine types

use crate::execution::OrderStatus;
use crate::strategy::Direction;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A trade record created by the execution gate
///
/// Immutable once created except for status transitions driven by the
/// order backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Trade identifier: paper sequence id or backend order id
    pub id: String,
    pub symbol: String,
    pub action: Direction,
    pub quantity: i64,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
    /// Name of the strategy whose signal produced this trade
    pub strategy: String,
    pub status: OrderStatus,
    pub realized_pnl: Decimal,
}

/// Per-strategy slice of the performance summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyPerformance {
    pub enabled: bool,
    pub description: String,
    pub signals_generated: u64,
    pub trades_made: u64,
    pub total_pnl: Decimal,
}

/// Read-only aggregation of engine and strategy counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub total_strategies: usize,
    pub enabled_strategies: usize,
    pub total_signals: usize,
    pub total_trades: usize,
    pub paper_trading: bool,
    pub strategies: BTreeMap<String, StrategyPerformance>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trade_serializes_round_trip() {
        let trade = Trade {
            id: "PAPER_0".to_string(),
            symbol: "AAPL".to_string(),
            action: Direction::Buy,
            quantity: 10,
            price: dec!(180.50),
            timestamp: Utc::now(),
            strategy: "MA_Cross_10_20".to_string(),
            status: OrderStatus::Filled,
            realized_pnl: dec!(0),
        };

        let json = serde_json::to_string(&trade).unwrap();
        let parsed: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, "PAPER_0");
        assert_eq!(parsed.action, Direction::Buy);
        assert_eq!(parsed.status, OrderStatus::Filled);
    }
}
