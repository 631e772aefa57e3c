//! Strategy types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Buy,
    Sell,
    Hold,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Buy => write!(f, "BUY"),
            Direction::Sell => write!(f, "SELL"),
            Direction::Hold => write!(f, "HOLD"),
        }
    }
}

/// A trading signal produced by a strategy
///
/// HOLD is never materialized as a signal; strategies emit nothing for
/// symbols in the neutral zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingSignal {
    /// Unique signal identifier
    pub id: Uuid,
    /// Symbol the signal applies to
    pub symbol: String,
    /// Trade direction
    pub direction: Direction,
    /// Confidence score in [0, 1]
    pub confidence: f64,
    /// Reference price at signal time
    pub price: Decimal,
    /// Suggested share quantity (>= 1)
    pub quantity: i64,
    /// Name of the generating strategy
    pub strategy: String,
    /// Signal generation timestamp
    pub timestamp: DateTime<Utc>,
    /// Strategy-specific diagnostics
    pub metadata: BTreeMap<String, String>,
}

impl TradingSignal {
    /// Create a new signal with a fresh identifier
    pub fn new(
        symbol: impl Into<String>,
        direction: Direction,
        confidence: f64,
        price: Decimal,
        quantity: i64,
        strategy: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: symbol.into(),
            direction,
            confidence,
            price,
            quantity,
            strategy: strategy.into(),
            timestamp: Utc::now(),
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a metadata entry
    pub fn with_meta(mut self, key: &str, value: impl ToString) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }
}

/// Running per-strategy counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyStats {
    /// Signals emitted over the strategy's lifetime
    pub signals_generated: u64,
    /// Trades executed from this strategy's signals
    pub trades_made: u64,
    /// Realized profit and loss attributed to the strategy
    pub total_pnl: Decimal,
}
