//! Market data types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single historical price/volume bar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    /// Bar timestamp
    pub timestamp: DateTime<Utc>,
    /// Closing price
    pub close: Decimal,
    /// Traded volume
    pub volume: Decimal,
}

/// An ascending-time sequence of bars for one symbol
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BarSeries {
    pub bars: Vec<Bar>,
}

impl BarSeries {
    /// Create a series from bars already ordered ascending by time
    pub fn new(bars: Vec<Bar>) -> Self {
        Self { bars }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Most recent bar
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Closing prices as f64 for indicator math
    pub fn closes(&self) -> Vec<f64> {
        self.bars
            .iter()
            .map(|b| b.close.try_into().unwrap_or(0.0))
            .collect()
    }

    /// Volumes as f64 for indicator math
    pub fn volumes(&self) -> Vec<f64> {
        self.bars
            .iter()
            .map(|b| b.volume.try_into().unwrap_or(0.0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn series(closes: &[Decimal]) -> BarSeries {
        let start = Utc::now() - Duration::days(closes.len() as i64);
        BarSeries::new(
            closes
                .iter()
                .enumerate()
                .map(|(i, close)| Bar {
                    timestamp: start + Duration::days(i as i64),
                    close: *close,
                    volume: dec!(100000),
                })
                .collect(),
        )
    }

    #[test]
    fn test_series_accessors() {
        let s = series(&[dec!(100), dec!(101.5), dec!(99)]);
        assert_eq!(s.len(), 3);
        assert!(!s.is_empty());
        assert_eq!(s.last().unwrap().close, dec!(99));
        assert_eq!(s.closes(), vec![100.0, 101.5, 99.0]);
        assert_eq!(s.volumes(), vec![100000.0; 3]);
    }

    #[test]
    fn test_empty_series() {
        let s = BarSeries::default();
        assert!(s.is_empty());
        assert!(s.last().is_none());
        assert!(s.closes().is_empty());
    }
}
