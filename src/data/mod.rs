//! Market data module
//!
//! Historical bar retrieval for strategy and risk analysis

mod rest;
mod types;

pub use rest::{RestConfig, RestMarketData};
pub use types::{Bar, BarSeries};

use async_trait::async_trait;
use std::collections::HashMap;

/// Trait for market data provider implementations
///
/// Symbols that fail to resolve are simply absent from the result; the
/// provider never fails the whole batch for one bad symbol.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch historical bars for a set of symbols
    async fn get_bars(&self, symbols: &[String]) -> anyhow::Result<HashMap<String, BarSeries>>;
}
