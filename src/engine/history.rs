//! Bounded signal history
//!
//! Sliding window over generated signals: newest at the back, oldest
//! evicted from the front once capacity is reached.

use crate::strategy::TradingSignal;
use std::collections::VecDeque;

/// Sliding window of the most recent signals
#[derive(Debug)]
pub struct SignalHistory {
    signals: VecDeque<TradingSignal>,
    capacity: usize,
}

impl SignalHistory {
    /// Create a history bounded to `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            signals: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Append a signal, evicting the oldest entry when full
    pub fn push(&mut self, signal: TradingSignal) {
        if self.capacity == 0 {
            return;
        }
        while self.signals.len() >= self.capacity {
            self.signals.pop_front();
        }
        self.signals.push_back(signal);
    }

    /// Append a batch in order
    pub fn extend(&mut self, signals: impl IntoIterator<Item = TradingSignal>) {
        for signal in signals {
            self.push(signal);
        }
    }

    /// Number of retained signals
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// The most recent `count` signals, oldest first
    pub fn recent(&self, count: usize) -> Vec<TradingSignal> {
        self.signals
            .iter()
            .skip(self.signals.len().saturating_sub(count))
            .cloned()
            .collect()
    }
}
