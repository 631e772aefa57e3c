//! Strategy engine module
//!
//! Owns the strategy collection, turns market data into ranked signals and
//! gates their execution behind a paper/live mode switch. The engine is
//! created in paper mode and only leaves it on an exact confirmation token.

mod history;
mod types;

pub use history::SignalHistory;
pub use types::{PerformanceSummary, StrategyPerformance, Trade};

use crate::data::MarketDataProvider;
use crate::execution::{OrderBackend, OrderStatus, TradingMode};
use crate::strategy::{Direction, Strategy, TradingSignal};
use chrono::Utc;
use metrics::counter;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

/// Exact token required to switch the engine into live mode
pub const LIVE_TRADING_CONFIRMATION: &str = "ENABLE_LIVE_TRADING_I_UNDERSTAND_THE_RISKS";

/// Default confidence floor applied to every strategy's output
pub const DEFAULT_MIN_SIGNAL_CONFIDENCE: f64 = 0.4;

/// Default bound on retained signal history
pub const DEFAULT_SIGNAL_HISTORY_LIMIT: usize = 1000;

/// Strategy engine: signal aggregation and gated execution
///
/// All state is instance-owned and mutated only by `generate_all_signals`,
/// `execute_signal` and the live-mode switches. Callers serialize access;
/// the engine takes `&mut self` and holds no internal locks.
pub struct StrategyEngine {
    strategies: Vec<Box<dyn Strategy>>,
    market_data: Arc<dyn MarketDataProvider>,
    orders: Arc<dyn OrderBackend>,
    trades: Vec<Trade>,
    history: SignalHistory,
    mode: TradingMode,
    min_signal_confidence: f64,
    paper_seq: u64,
}

impl StrategyEngine {
    /// Create an engine in paper mode with default settings
    pub fn new(
        market_data: Arc<dyn MarketDataProvider>,
        orders: Arc<dyn OrderBackend>,
    ) -> Self {
        tracing::info!("Strategy engine initialized in paper trading mode");
        Self {
            strategies: Vec::new(),
            market_data,
            orders,
            trades: Vec::new(),
            history: SignalHistory::new(DEFAULT_SIGNAL_HISTORY_LIMIT),
            mode: TradingMode::Paper,
            min_signal_confidence: DEFAULT_MIN_SIGNAL_CONFIDENCE,
            paper_seq: 0,
        }
    }

    /// Override the engine-level confidence floor
    pub fn with_min_confidence(mut self, min_signal_confidence: f64) -> Self {
        self.min_signal_confidence = min_signal_confidence;
        self
    }

    /// Override the signal history bound
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history = SignalHistory::new(limit);
        self
    }

    /// Current execution mode
    pub fn mode(&self) -> TradingMode {
        self.mode
    }

    /// Add a strategy to the engine
    pub fn add_strategy(&mut self, strategy: Box<dyn Strategy>) {
        tracing::info!(
            strategy = strategy.name(),
            description = strategy.description(),
            "Added strategy"
        );
        self.strategies.push(strategy);
    }

    /// Remove a strategy by name; no-op when absent
    pub fn remove_strategy(&mut self, name: &str) {
        let before = self.strategies.len();
        self.strategies.retain(|s| s.name() != name);
        if self.strategies.len() < before {
            tracing::info!(strategy = name, "Removed strategy");
        }
    }

    /// Look up a strategy by name
    pub fn strategy(&self, name: &str) -> Option<&dyn Strategy> {
        self.strategies
            .iter()
            .find(|s| s.name() == name)
            .map(|s| s.as_ref())
    }

    /// Look up a strategy by name for reconfiguration (enable/disable)
    pub fn strategy_mut(&mut self, name: &str) -> Option<&mut Box<dyn Strategy>> {
        self.strategies.iter_mut().find(|s| s.name() == name)
    }

    /// Run every enabled strategy over fresh market data
    ///
    /// Per-strategy output is filtered to the engine confidence floor,
    /// merged, deduplicated by (symbol, direction) keeping the
    /// highest-confidence entry, and ranked descending by confidence.
    /// Symbols the provider cannot resolve are dropped; a provider failure
    /// degrades to an empty batch rather than an error.
    pub async fn generate_all_signals(&mut self, symbols: &[String]) -> Vec<TradingSignal> {
        tracing::info!(symbols = symbols.len(), "Fetching market data");
        let market_data = match self.market_data.get_bars(symbols).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(error = %e, "Market data provider unavailable");
                HashMap::new()
            }
        };

        if market_data.is_empty() {
            tracing::warn!("No market data available - cannot generate signals");
            return Vec::new();
        }

        let mut all_signals = Vec::new();
        for strategy in &mut self.strategies {
            if !strategy.is_enabled() {
                continue;
            }

            let raw = strategy.generate_signals(&market_data);
            let total = raw.len();
            let mut filtered: Vec<TradingSignal> = raw
                .into_iter()
                .filter(|s| s.confidence >= self.min_signal_confidence)
                .collect();

            tracing::info!(
                strategy = strategy.name(),
                kept = filtered.len(),
                total,
                "Strategy output filtered"
            );
            all_signals.append(&mut filtered);
        }

        // One signal per (symbol, direction), keeping the strongest
        let mut unique: HashMap<(String, Direction), TradingSignal> = HashMap::new();
        for signal in all_signals {
            let key = (signal.symbol.clone(), signal.direction);
            match unique.get(&key) {
                Some(existing) if existing.confidence >= signal.confidence => {}
                _ => {
                    unique.insert(key, signal);
                }
            }
        }

        let mut final_signals: Vec<TradingSignal> = unique.into_values().collect();
        final_signals.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        counter!("alphadesk_signals_generated_total").increment(final_signals.len() as u64);
        self.history.extend(final_signals.iter().cloned());

        tracing::info!(signals = final_signals.len(), "Generated unique signals");
        final_signals
    }

    /// Execute a signal through the current mode's path
    ///
    /// Paper mode synthesizes an immediately-filled trade and never touches
    /// the order backend. Live mode places a real order; a backend failure
    /// is logged and yields `None` with no partial trade recorded.
    pub async fn execute_signal(&mut self, signal: &TradingSignal) -> Option<Trade> {
        let trade = match self.mode {
            TradingMode::Paper => {
                let trade = Trade {
                    id: format!("PAPER_{}", self.paper_seq),
                    symbol: signal.symbol.clone(),
                    action: signal.direction,
                    quantity: signal.quantity,
                    price: signal.price,
                    timestamp: Utc::now(),
                    strategy: signal.strategy.clone(),
                    status: OrderStatus::Filled,
                    realized_pnl: Decimal::ZERO,
                };
                self.paper_seq += 1;

                tracing::info!(
                    id = %trade.id,
                    action = %trade.action,
                    quantity = trade.quantity,
                    symbol = %trade.symbol,
                    price = %trade.price,
                    "Paper trade filled"
                );
                trade
            }
            TradingMode::Live => {
                let ack = match self
                    .orders
                    .place_order(&signal.symbol, signal.direction, signal.quantity)
                    .await
                {
                    Ok(ack) => ack,
                    Err(e) => {
                        tracing::error!(
                            symbol = %signal.symbol,
                            error = %e,
                            "Failed to place live order"
                        );
                        return None;
                    }
                };

                tracing::info!(
                    order_id = %ack.order_id,
                    ack_status = ?ack.status,
                    action = %signal.direction,
                    quantity = signal.quantity,
                    symbol = %signal.symbol,
                    "Live order placed"
                );

                Trade {
                    id: ack.order_id,
                    symbol: signal.symbol.clone(),
                    action: signal.direction,
                    quantity: signal.quantity,
                    price: signal.price,
                    timestamp: Utc::now(),
                    strategy: signal.strategy.clone(),
                    status: OrderStatus::Pending,
                    realized_pnl: Decimal::ZERO,
                }
            }
        };

        if let Some(strategy) = self
            .strategies
            .iter_mut()
            .find(|s| s.name() == signal.strategy)
        {
            strategy.stats_mut().trades_made += 1;
        }

        counter!("alphadesk_trades_executed_total").increment(1);
        self.trades.push(trade.clone());
        Some(trade)
    }

    /// Switch to live mode, requiring the exact confirmation token
    ///
    /// Any other token leaves the mode unchanged and reports failure.
    pub fn enable_live_trading(&mut self, token: &str) -> bool {
        if token != LIVE_TRADING_CONFIRMATION {
            tracing::warn!("Live trading not enabled - confirmation token mismatch");
            return false;
        }

        self.mode = TradingMode::Live;
        tracing::warn!("LIVE TRADING ENABLED - real orders will be placed");
        true
    }

    /// Revert to paper mode; always succeeds
    pub fn disable_live_trading(&mut self) {
        self.mode = TradingMode::Paper;
        tracing::info!("Switched back to paper trading mode");
    }

    /// Read-only aggregation of engine and strategy counters
    pub fn get_performance_summary(&self) -> PerformanceSummary {
        let strategies = self
            .strategies
            .iter()
            .map(|s| {
                let stats = s.stats();
                (
                    s.name().to_string(),
                    StrategyPerformance {
                        enabled: s.is_enabled(),
                        description: s.description().to_string(),
                        signals_generated: stats.signals_generated,
                        trades_made: stats.trades_made,
                        total_pnl: stats.total_pnl,
                    },
                )
            })
            .collect();

        PerformanceSummary {
            total_strategies: self.strategies.len(),
            enabled_strategies: self.strategies.iter().filter(|s| s.is_enabled()).count(),
            total_signals: self.history.len(),
            total_trades: self.trades.len(),
            paper_trading: self.mode == TradingMode::Paper,
            strategies,
        }
    }

    /// Most recent signals, oldest first
    pub fn recent_signals(&self, count: usize) -> Vec<TradingSignal> {
        self.history.recent(count)
    }

    /// Most recent trades, oldest first
    pub fn recent_trades(&self, count: usize) -> Vec<Trade> {
        self.trades
            .iter()
            .skip(self.trades.len().saturating_sub(count))
            .cloned()
            .collect()
    }
}
