//! Execution types

use serde::{Deserialize, Serialize};

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Submitted, awaiting fill
    Pending,
    /// Fully executed
    Filled,
    /// Cancelled before fill
    Cancelled,
    /// Rejected by the backend
    Rejected,
}

/// Execution mode: simulated or real orders
///
/// The engine always starts in paper mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    Paper,
    Live,
}

/// Acknowledgement returned by an order backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderAck {
    /// Backend-assigned order identifier
    pub order_id: String,
    /// Initial order status
    pub status: OrderStatus,
}
