//! Execution module
//!
//! Order backend interface for live trading. Paper execution never touches
//! a backend; the strategy engine synthesizes fills directly.

mod types;

pub use types::{OrderAck, OrderStatus, TradingMode};

use crate::strategy::Direction;
use async_trait::async_trait;

/// Trait for live order backend implementations
#[async_trait]
pub trait OrderBackend: Send + Sync {
    /// Place a market order, returning the backend's identifier and status
    async fn place_order(
        &self,
        symbol: &str,
        action: Direction,
        quantity: i64,
    ) -> anyhow::Result<OrderAck>;
}

/// Backend used when no live connection is configured
///
/// Every order is refused; paper mode never reaches it.
pub struct DisabledOrderBackend;

#[async_trait]
impl OrderBackend for DisabledOrderBackend {
    async fn place_order(
        &self,
        symbol: &str,
        _action: Direction,
        _quantity: i64,
    ) -> anyhow::Result<OrderAck> {
        anyhow::bail!("no live order backend configured (order for {})", symbol)
    }
}
