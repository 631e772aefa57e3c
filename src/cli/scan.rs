//! Scan command implementation

use crate::config::Config;
use crate::data::{RestConfig, RestMarketData};
use crate::engine::StrategyEngine;
use crate::execution::DisabledOrderBackend;
use crate::strategy::{MaCrossover, RsiMeanReversion};
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Symbols to scan (defaults to the configured watchlist)
    #[arg(short, long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Execute the resulting signals as paper trades
    #[arg(long)]
    pub paper: bool,
}

impl ScanArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let symbols = if self.symbols.is_empty() {
            config.engine.watchlist.clone()
        } else {
            self.symbols.clone()
        };
        if symbols.is_empty() {
            anyhow::bail!("no symbols to scan: pass --symbols or configure engine.watchlist");
        }

        let market_data = Arc::new(RestMarketData::new(RestConfig {
            base_url: config.data.base_url.clone(),
            lookback_days: config.data.lookback_days,
            timeout: Duration::from_secs(config.data.request_timeout_secs),
        }));

        let mut engine = StrategyEngine::new(market_data, Arc::new(DisabledOrderBackend))
            .with_min_confidence(config.engine.min_signal_confidence)
            .with_history_limit(config.engine.signal_history_limit);

        let ma = &config.strategies.moving_average;
        if ma.enabled {
            engine.add_strategy(Box::new(MaCrossover::new(ma.into())?));
        }
        let rsi = &config.strategies.rsi;
        if rsi.enabled {
            engine.add_strategy(Box::new(RsiMeanReversion::new(rsi.into())?));
        }

        let signals = engine.generate_all_signals(&symbols).await;

        if signals.is_empty() {
            println!("No signals for {} symbols", symbols.len());
            return Ok(());
        }

        println!("{} signals:", signals.len());
        for signal in &signals {
            println!(
                "  {:<4} {:<6} @ {:>10}  confidence {:>5.1}%  qty {:>5}  [{}]",
                signal.direction.to_string(),
                signal.symbol,
                signal.price,
                signal.confidence * 100.0,
                signal.quantity,
                signal.strategy
            );
        }

        if self.paper {
            println!();
            for signal in &signals {
                if let Some(trade) = engine.execute_signal(signal).await {
                    println!(
                        "  paper trade {}: {} {} {} @ {}",
                        trade.id, trade.action, trade.quantity, trade.symbol, trade.price
                    );
                }
            }

            let summary = engine.get_performance_summary();
            println!(
                "\n{} trades recorded across {} strategies (paper mode: {})",
                summary.total_trades, summary.total_strategies, summary.paper_trading
            );
        }

        Ok(())
    }
}
