//! Rolling alert log
//!
//! Alerts are retained for a fixed window and pruned on every analysis
//! pass; the log never serves an alert older than the window.

use super::RiskAlert;
use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;

/// How long alerts stay visible
pub fn retention() -> Duration {
    Duration::hours(1)
}

/// Time-ordered alert log with oldest-first eviction
#[derive(Debug, Default)]
pub struct AlertLog {
    alerts: VecDeque<RiskAlert>,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an alert (assumed newest)
    pub fn push(&mut self, alert: RiskAlert) {
        tracing::warn!(
            symbol = %alert.symbol,
            risk_type = %alert.risk_type,
            level = ?alert.level,
            value = alert.value,
            threshold = alert.threshold,
            "Risk alert"
        );
        self.alerts.push_back(alert);
    }

    /// Drop every alert older than the cutoff
    pub fn prune(&mut self, cutoff: DateTime<Utc>) {
        while let Some(front) = self.alerts.front() {
            if front.timestamp < cutoff {
                self.alerts.pop_front();
            } else {
                break;
            }
        }
    }

    /// The most recent `count` alerts, oldest first
    pub fn recent(&self, count: usize) -> Vec<RiskAlert> {
        self.alerts
            .iter()
            .skip(self.alerts.len().saturating_sub(count))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}
