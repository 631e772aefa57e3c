//! Trading strategy module
//!
//! Pure signal generators over per-symbol bar series

mod moving_average;
mod rsi;
mod types;

pub use moving_average::{MaCrossover, MaCrossoverParams};
pub use rsi::{RsiMeanReversion, RsiParams};
pub use types::{Direction, StrategyStats, TradingSignal};

use crate::data::BarSeries;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use thiserror::Error;

/// Portfolio value used to size signal quantities until account data is wired in
pub const DEFAULT_PORTFOLIO_VALUE: f64 = 100_000.0;

/// Strategy errors
#[derive(Debug, Error)]
pub enum StrategyError {
    /// Construction parameter out of its documented range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// Symbol lacks the bars the strategy needs
    #[error("insufficient data for {symbol}: {have} < {need} bars")]
    InsufficientData {
        symbol: String,
        have: usize,
        need: usize,
    },
    /// Symbol series contains unusable values
    #[error("bad value for {symbol}: {reason}")]
    BadValue { symbol: String, reason: String },
}

/// Trait for trading strategy implementations
///
/// A strategy is a pure function from bar series to signals plus a position
/// sizing rule. A failure on one symbol must never abort the batch; it is
/// logged and that symbol is skipped.
pub trait Strategy: Send + Sync {
    /// Strategy name (unique within an engine)
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str;

    /// Whether the engine should run this strategy
    fn is_enabled(&self) -> bool;

    /// Enable or disable the strategy
    fn set_enabled(&mut self, enabled: bool);

    /// Lifetime counters
    fn stats(&self) -> &StrategyStats;

    /// Mutable lifetime counters (engine bookkeeping)
    fn stats_mut(&mut self) -> &mut StrategyStats;

    /// Generate signals for every analyzable symbol
    fn generate_signals(&mut self, market_data: &HashMap<String, BarSeries>)
        -> Vec<TradingSignal>;

    /// Share quantity for a signal given a portfolio value
    fn calculate_position_size(&self, signal: &TradingSignal, portfolio_value: f64) -> i64;
}

/// Shared sizing rule: a fixed percentage of portfolio value, at least one share
pub(crate) fn position_size(price: Decimal, position_size_pct: f64, portfolio_value: f64) -> i64 {
    let price = price.to_f64().unwrap_or(0.0);
    if price <= 0.0 {
        return 1;
    }
    let shares = (portfolio_value * position_size_pct / price).floor() as i64;
    shares.max(1)
}
