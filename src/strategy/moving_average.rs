//! Moving average crossover strategy
//!
//! Buys a golden cross (fast MA crossing above slow MA) and sells a death
//! cross, with confidence scaled by crossover strength and adjusted for
//! volume, trend alignment and recent volatility.

use super::{position_size, Direction, Strategy, StrategyError, StrategyStats, TradingSignal};
use crate::data::BarSeries;
use crate::indicators::{mean, pct_changes, sma, std_dev};
use std::collections::HashMap;

/// Parameters for the MA crossover strategy
///
/// Validated at construction; immutable afterwards.
#[derive(Debug, Clone)]
pub struct MaCrossoverParams {
    /// Fast moving average window (bars)
    pub fast_period: usize,
    /// Slow moving average window (bars), must exceed `fast_period`
    pub slow_period: usize,
    /// Fraction of portfolio value per position, in [0.01, 0.20]
    pub position_size_pct: f64,
    /// Minimum current-bar volume to consider a symbol
    pub min_volume: f64,
}

impl Default for MaCrossoverParams {
    fn default() -> Self {
        Self {
            fast_period: 10,
            slow_period: 20,
            position_size_pct: 0.05,
            min_volume: 100_000.0,
        }
    }
}

impl MaCrossoverParams {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.fast_period == 0 || self.fast_period >= self.slow_period {
            return Err(StrategyError::InvalidParameter(format!(
                "fast period ({}) must be positive and less than slow period ({})",
                self.fast_period, self.slow_period
            )));
        }
        if !(0.01..=0.20).contains(&self.position_size_pct) {
            return Err(StrategyError::InvalidParameter(format!(
                "position size {} must be between 1% and 20%",
                self.position_size_pct
            )));
        }
        Ok(())
    }
}

/// Moving average crossover strategy
pub struct MaCrossover {
    name: String,
    description: String,
    params: MaCrossoverParams,
    enabled: bool,
    stats: StrategyStats,
}

impl MaCrossover {
    /// Floor below which signals are suppressed
    pub const MIN_CONFIDENCE: f64 = 0.2;
    /// Ceiling applied to every emitted confidence
    pub const MAX_CONFIDENCE: f64 = 0.8;

    /// Extra bars required beyond the slow window before signalling
    const WARMUP_BARS: usize = 5;

    /// Create a new strategy, validating parameters
    pub fn new(params: MaCrossoverParams) -> Result<Self, StrategyError> {
        params.validate()?;

        let name = format!("MA_Cross_{}_{}", params.fast_period, params.slow_period);
        let description = format!(
            "MA Crossover: {}-day vs {}-day moving averages",
            params.fast_period, params.slow_period
        );

        tracing::info!(
            fast = params.fast_period,
            slow = params.slow_period,
            position_size_pct = params.position_size_pct,
            "Initialized MA crossover strategy"
        );

        Ok(Self {
            name,
            description,
            params,
            enabled: true,
            stats: StrategyStats::default(),
        })
    }

    /// Create a strategy with default parameters
    pub fn with_defaults() -> Self {
        Self::new(MaCrossoverParams::default()).expect("default parameters are valid")
    }

    /// Strategy parameters
    pub fn params(&self) -> &MaCrossoverParams {
        &self.params
    }

    fn analyze_symbol(
        &self,
        symbol: &str,
        series: &BarSeries,
    ) -> Result<Option<TradingSignal>, StrategyError> {
        let need = self.params.slow_period + Self::WARMUP_BARS;
        if series.len() < need {
            return Err(StrategyError::InsufficientData {
                symbol: symbol.to_string(),
                have: series.len(),
                need,
            });
        }

        let closes = series.closes();
        let volumes = series.volumes();

        let current_price = *closes.last().unwrap_or(&0.0);
        if current_price <= 0.0 {
            return Err(StrategyError::BadValue {
                symbol: symbol.to_string(),
                reason: "non-positive close price".to_string(),
            });
        }

        let current_volume = *volumes.last().unwrap_or(&0.0);
        if current_volume < self.params.min_volume {
            tracing::debug!(symbol, volume = current_volume, "Volume too low");
            return Ok(None);
        }
        let avg_volume = mean(&volumes[volumes.len().saturating_sub(20)..]).unwrap_or(0.0);

        let fast = sma(&closes, self.params.fast_period);
        let slow = sma(&closes, self.params.slow_period);
        let prev = &closes[..closes.len() - 1];
        let prev_fast = sma(prev, self.params.fast_period);
        let prev_slow = sma(prev, self.params.slow_period);

        let (fast, slow, prev_fast, prev_slow) = match (fast, slow, prev_fast, prev_slow) {
            (Some(a), Some(b), Some(c), Some(d)) => (a, b, c, d),
            _ => return Ok(None),
        };

        let (direction, base_confidence) = match detect_crossover(prev_fast, prev_slow, fast, slow)
        {
            Some(detected) => detected,
            None => return Ok(None),
        };

        let confidence =
            self.apply_filters(&closes, direction, base_confidence, current_volume, avg_volume);

        if confidence < Self::MIN_CONFIDENCE {
            tracing::debug!(symbol, confidence, "Confidence too low");
            return Ok(None);
        }

        let price = series.last().map(|b| b.close).unwrap_or_default();
        let quantity = position_size(
            price,
            self.params.position_size_pct,
            super::DEFAULT_PORTFOLIO_VALUE,
        );

        let volume_ratio = current_volume / avg_volume.max(1.0);
        let signal = TradingSignal::new(symbol, direction, confidence, price, quantity, &self.name)
            .with_meta("fast_ma", format!("{:.2}", fast))
            .with_meta("slow_ma", format!("{:.2}", slow))
            .with_meta("ma_spread", format!("{:.2}", (fast - slow).abs()))
            .with_meta("volume_ratio", format!("{:.2}", volume_ratio))
            .with_meta(
                "crossover_type",
                if direction == Direction::Buy {
                    "golden"
                } else {
                    "death"
                },
            );

        tracing::info!(
            symbol,
            direction = %direction,
            price = %price,
            confidence,
            "MA crossover signal"
        );

        Ok(Some(signal))
    }

    /// Adjust base confidence for volume, trend alignment and volatility
    fn apply_filters(
        &self,
        closes: &[f64],
        direction: Direction,
        base_confidence: f64,
        current_volume: f64,
        avg_volume: f64,
    ) -> f64 {
        let mut confidence = base_confidence;

        let volume_ratio = current_volume / avg_volume.max(1.0);
        if volume_ratio > 1.5 {
            confidence *= 1.2;
        } else if volume_ratio < 0.5 {
            confidence *= 0.8;
        }

        // Boost when the 5-bar trend exceeds 2% and agrees with the signal
        if closes.len() >= 5 {
            let recent = &closes[closes.len() - 5..];
            if recent[0] != 0.0 {
                let trend = (recent[4] - recent[0]) / recent[0];
                let agrees = match direction {
                    Direction::Buy => trend > 0.02,
                    Direction::Sell => trend < -0.02,
                    Direction::Hold => false,
                };
                if agrees {
                    confidence *= 1.1;
                }
            }
        }

        if closes.len() >= 20 {
            let returns = pct_changes(closes);
            let tail = &returns[returns.len().saturating_sub(20)..];
            if let Some(volatility) = std_dev(tail) {
                if volatility > 0.05 {
                    confidence *= 0.9;
                }
            }
        }

        confidence.clamp(0.0, Self::MAX_CONFIDENCE)
    }
}

/// Detect a crossover between the two most recent bars
///
/// Returns the direction and base confidence, or None when no cross occurred.
fn detect_crossover(
    prev_fast: f64,
    prev_slow: f64,
    fast: f64,
    slow: f64,
) -> Option<(Direction, f64)> {
    if prev_fast <= prev_slow && fast > slow && slow != 0.0 {
        let spread_pct = (fast - slow) / slow;
        let confidence = (spread_pct * 20.0).max(0.1).min(MaCrossover::MAX_CONFIDENCE);
        Some((Direction::Buy, confidence))
    } else if prev_fast >= prev_slow && fast < slow && fast != 0.0 {
        let spread_pct = (slow - fast) / fast;
        let confidence = (spread_pct * 20.0).max(0.1).min(MaCrossover::MAX_CONFIDENCE);
        Some((Direction::Sell, confidence))
    } else {
        None
    }
}

impl Strategy for MaCrossover {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn stats(&self) -> &StrategyStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut StrategyStats {
        &mut self.stats
    }

    fn generate_signals(
        &mut self,
        market_data: &HashMap<String, BarSeries>,
    ) -> Vec<TradingSignal> {
        let mut signals = Vec::new();

        for (symbol, series) in market_data {
            match self.analyze_symbol(symbol, series) {
                Ok(Some(signal)) => signals.push(signal),
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(symbol = %symbol, error = %e, "Skipping symbol");
                }
            }
        }

        self.stats.signals_generated += signals.len() as u64;
        tracing::info!(
            strategy = %self.name,
            signals = signals.len(),
            symbols = market_data.len(),
            "Generated MA signals"
        );
        signals
    }

    fn calculate_position_size(&self, signal: &TradingSignal, portfolio_value: f64) -> i64 {
        position_size(signal.price, self.params.position_size_pct, portfolio_value)
    }
}
