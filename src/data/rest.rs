//! REST market data client
//!
//! Fetches daily bars from a JSON bar service. Each symbol is queried
//! independently and concurrently; a failed symbol is logged and omitted
//! from the result so one bad ticker never sinks the batch.

use super::{Bar, BarSeries, MarketDataProvider};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Configuration for the REST bar client
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Base URL of the bar service
    pub base_url: String,
    /// Number of daily bars to request
    pub lookback_days: u32,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            lookback_days: 252,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Market data provider backed by a REST bar service
pub struct RestMarketData {
    config: RestConfig,
    client: Client,
}

/// Wire format of one bar from the service
#[derive(Debug, Deserialize)]
struct WireBar {
    /// Epoch seconds
    t: i64,
    /// Close price
    c: Decimal,
    /// Volume
    v: Decimal,
}

impl RestMarketData {
    /// Create a new client with the given configuration
    pub fn new(config: RestConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self { config, client }
    }

    /// Fetch bars for a single symbol
    async fn fetch_symbol(&self, symbol: &str) -> anyhow::Result<BarSeries> {
        let url = format!("{}/bars", self.config.base_url);

        tracing::debug!(url = %url, symbol, "Fetching bars");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol.to_string()),
                ("days", self.config.lookback_days.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("bar service error for {}: {} - {}", symbol, status, body);
        }

        let wire: Vec<WireBar> = response.json().await?;

        let mut bars: Vec<Bar> = wire
            .into_iter()
            .filter_map(|w| {
                DateTime::<Utc>::from_timestamp(w.t, 0).map(|timestamp| Bar {
                    timestamp,
                    close: w.c,
                    volume: w.v,
                })
            })
            .collect();
        bars.sort_by_key(|b| b.timestamp);

        Ok(BarSeries::new(bars))
    }
}

#[async_trait]
impl MarketDataProvider for RestMarketData {
    async fn get_bars(&self, symbols: &[String]) -> anyhow::Result<HashMap<String, BarSeries>> {
        let fetches = symbols.iter().map(|symbol| async move {
            (symbol.clone(), self.fetch_symbol(symbol).await)
        });

        let mut series = HashMap::new();
        for (symbol, result) in join_all(fetches).await {
            match result {
                Ok(bars) if !bars.is_empty() => {
                    tracing::debug!(symbol = %symbol, bars = bars.len(), "Got bars");
                    series.insert(symbol, bars);
                }
                Ok(_) => {
                    tracing::warn!(symbol = %symbol, "No historical data received");
                }
                Err(e) => {
                    tracing::warn!(symbol = %symbol, error = %e, "Failed to fetch bars");
                }
            }
        }

        Ok(series)
    }
}
