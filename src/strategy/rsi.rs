//! RSI mean reversion strategy
//!
//! Buys oversold symbols and sells overbought ones, expecting price to
//! revert toward its average. Confidence scales with how deep into the
//! oversold/overbought zone the RSI sits.

use super::{position_size, Direction, Strategy, StrategyError, StrategyStats, TradingSignal};
use crate::data::BarSeries;
use crate::indicators::{mean, pct_changes, rsi_series, std_dev};
use std::collections::HashMap;

/// Parameters for the RSI mean reversion strategy
///
/// Validated at construction; immutable afterwards.
#[derive(Debug, Clone)]
pub struct RsiParams {
    /// RSI lookback period, in [2, 50]
    pub rsi_period: usize,
    /// Buy below this RSI level
    pub oversold_threshold: f64,
    /// Sell above this RSI level
    pub overbought_threshold: f64,
    /// Fraction of portfolio value per position, in [0.01, 0.15]
    pub position_size_pct: f64,
    /// Minimum current-bar volume to consider a symbol
    pub min_volume: f64,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            oversold_threshold: 30.0,
            overbought_threshold: 70.0,
            position_size_pct: 0.03,
            min_volume: 100_000.0,
        }
    }
}

impl RsiParams {
    fn validate(&self) -> Result<(), StrategyError> {
        if !(2..=50).contains(&self.rsi_period) {
            return Err(StrategyError::InvalidParameter(format!(
                "RSI period {} must be between 2 and 50",
                self.rsi_period
            )));
        }
        let valid = 10.0 <= self.oversold_threshold
            && self.oversold_threshold < self.overbought_threshold
            && self.overbought_threshold <= 90.0;
        if !valid {
            return Err(StrategyError::InvalidParameter(format!(
                "invalid RSI thresholds: oversold {} / overbought {}",
                self.oversold_threshold, self.overbought_threshold
            )));
        }
        if !(0.01..=0.15).contains(&self.position_size_pct) {
            return Err(StrategyError::InvalidParameter(format!(
                "position size {} must be between 1% and 15%",
                self.position_size_pct
            )));
        }
        Ok(())
    }
}

/// RSI mean reversion strategy
pub struct RsiMeanReversion {
    name: String,
    description: String,
    params: RsiParams,
    /// RSI at or below this level is treated as extremely oversold
    extreme_oversold: f64,
    /// RSI at or above this level is treated as extremely overbought
    extreme_overbought: f64,
    enabled: bool,
    stats: StrategyStats,
}

impl RsiMeanReversion {
    /// Floor below which signals are suppressed
    pub const MIN_CONFIDENCE: f64 = 0.3;
    /// Ceiling applied to every emitted confidence
    pub const MAX_CONFIDENCE: f64 = 0.9;

    /// Extra bars required beyond the RSI period before signalling
    const WARMUP_BARS: usize = 20;

    /// Create a new strategy, validating parameters
    pub fn new(params: RsiParams) -> Result<Self, StrategyError> {
        params.validate()?;

        let name = format!(
            "RSI_{}_{}_{}",
            params.rsi_period, params.oversold_threshold as i64, params.overbought_threshold as i64
        );
        let description = format!(
            "RSI Mean Reversion: Buy<{}, Sell>{}",
            params.oversold_threshold, params.overbought_threshold
        );

        tracing::info!(
            period = params.rsi_period,
            oversold = params.oversold_threshold,
            overbought = params.overbought_threshold,
            "Initialized RSI strategy"
        );

        Ok(Self {
            extreme_oversold: params.oversold_threshold - 10.0,
            extreme_overbought: params.overbought_threshold + 10.0,
            name,
            description,
            params,
            enabled: true,
            stats: StrategyStats::default(),
        })
    }

    /// Create a strategy with default parameters
    pub fn with_defaults() -> Self {
        Self::new(RsiParams::default()).expect("default parameters are valid")
    }

    /// Strategy parameters
    pub fn params(&self) -> &RsiParams {
        &self.params
    }

    fn analyze_symbol(
        &self,
        symbol: &str,
        series: &BarSeries,
    ) -> Result<Option<TradingSignal>, StrategyError> {
        let need = self.params.rsi_period + Self::WARMUP_BARS;
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

        let rsi = rsi_series(&closes, self.params.rsi_period);
        let current_rsi = *rsi.last().unwrap_or(&50.0);

        let (direction, base_confidence) = match self.determine_signal(current_rsi) {
            Some(detected) => detected,
            None => return Ok(None),
        };

        let confidence = self.apply_filters(
            &closes,
            &volumes,
            &rsi,
            current_rsi,
            base_confidence,
            current_volume,
        );

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

        let signal = TradingSignal::new(symbol, direction, confidence, price, quantity, &self.name)
            .with_meta("rsi", format!("{:.2}", current_rsi))
            .with_meta("rsi_category", rsi_category(current_rsi))
            .with_meta("oversold_threshold", self.params.oversold_threshold)
            .with_meta("overbought_threshold", self.params.overbought_threshold)
            .with_meta("signal_strength", self.signal_strength(current_rsi))
            .with_meta("volume", format!("{:.0}", current_volume));

        tracing::info!(
            symbol,
            direction = %direction,
            rsi = current_rsi,
            price = %price,
            confidence,
            "RSI signal"
        );

        Ok(Some(signal))
    }

    /// Map an RSI level to a direction and base confidence
    ///
    /// Confidence rises linearly from 0.3 as the RSI moves deeper past the
    /// threshold, jumping to 0.8 in the extreme zone.
    fn determine_signal(&self, rsi: f64) -> Option<(Direction, f64)> {
        let oversold = self.params.oversold_threshold;
        let overbought = self.params.overbought_threshold;

        let (direction, confidence) = if rsi <= oversold {
            let confidence = if rsi <= self.extreme_oversold {
                0.8
            } else {
                ((oversold - rsi) / oversold * 2.0).max(0.3)
            };
            (Direction::Buy, confidence)
        } else if rsi >= overbought {
            let confidence = if rsi >= self.extreme_overbought {
                0.8
            } else {
                ((rsi - overbought) / (100.0 - overbought) * 2.0).max(0.3)
            };
            (Direction::Sell, confidence)
        } else {
            return None;
        };

        Some((direction, confidence.min(Self::MAX_CONFIDENCE)))
    }

    /// Adjust base confidence for volume, RSI reversal, momentum and volatility
    fn apply_filters(
        &self,
        closes: &[f64],
        volumes: &[f64],
        rsi: &[f64],
        current_rsi: f64,
        base_confidence: f64,
        current_volume: f64,
    ) -> f64 {
        let mut confidence = base_confidence;

        let avg_volume = mean(&volumes[volumes.len().saturating_sub(20)..]).unwrap_or(1.0);
        let volume_ratio = current_volume / avg_volume.max(1.0);
        if volume_ratio > 1.5 {
            confidence *= 1.15;
        } else if volume_ratio < 0.7 {
            confidence *= 0.85;
        }

        // Prefer an RSI that has started turning back toward neutral
        if rsi.len() >= 5 {
            let recent = &rsi[rsi.len() - 5..];
            if current_rsi < 35.0 && recent[4] > recent[2] {
                confidence *= 1.1;
            } else if current_rsi > 65.0 && recent[4] < recent[2] {
                confidence *= 1.1;
            }
        }

        // Penalize fighting strong momentum
        if closes.len() >= 10 {
            let returns = pct_changes(closes);
            let recent = &returns[returns.len().saturating_sub(5)..];
            if let Some(recent_mean) = mean(recent) {
                if current_rsi < 35.0 && recent_mean < -0.02 {
                    confidence *= 0.9;
                } else if current_rsi > 65.0 && recent_mean > 0.02 {
                    confidence *= 0.9;
                }
            }
        }

        // Mean reversion works best in a normal volatility regime
        if closes.len() >= 20 {
            let returns = pct_changes(closes);
            let tail = &returns[returns.len().saturating_sub(20)..];
            if let Some(volatility) = std_dev(tail) {
                if volatility > 0.06 {
                    confidence *= 0.85;
                } else if volatility < 0.02 {
                    confidence *= 1.05;
                }
            }
        }

        confidence.clamp(0.0, Self::MAX_CONFIDENCE)
    }

    fn signal_strength(&self, rsi: f64) -> &'static str {
        if rsi <= self.extreme_oversold || rsi >= self.extreme_overbought {
            "Very Strong"
        } else if rsi <= self.params.oversold_threshold || rsi >= self.params.overbought_threshold
        {
            "Strong"
        } else {
            "Weak"
        }
    }
}

/// Human-readable RSI zone label
fn rsi_category(rsi: f64) -> &'static str {
    if rsi <= 20.0 {
        "Extremely Oversold"
    } else if rsi <= 30.0 {
        "Oversold"
    } else if rsi >= 80.0 {
        "Extremely Overbought"
    } else if rsi >= 70.0 {
        "Overbought"
    } else if (40.0..=60.0).contains(&rsi) {
        "Neutral"
    } else {
        "Trending"
    }
}

impl Strategy for RsiMeanReversion {
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
            "Generated RSI signals"
        );
        signals
    }

    fn calculate_position_size(&self, signal: &TradingSignal, portfolio_value: f64) -> i64 {
        position_size(signal.price, self.params.position_size_pct, portfolio_value)
    }
}
