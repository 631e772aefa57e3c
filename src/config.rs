//! Configuration types for alpha-desk

use crate::risk::RiskLimits;
use crate::strategy::{MaCrossoverParams, RsiParams};
use crate::telemetry::LogFormat;
use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub risk: RiskLimits,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub strategies: StrategiesConfig,
}

/// Strategy engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Confidence floor applied to every strategy's output
    #[serde(default = "default_min_signal_confidence")]
    pub min_signal_confidence: f64,

    /// Bound on retained signal history
    #[serde(default = "default_signal_history_limit")]
    pub signal_history_limit: usize,

    /// Symbols scanned when the CLI is given none
    #[serde(default)]
    pub watchlist: Vec<String>,
}

fn default_min_signal_confidence() -> f64 {
    0.4
}
fn default_signal_history_limit() -> usize {
    1000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_signal_confidence: default_min_signal_confidence(),
            signal_history_limit: default_signal_history_limit(),
            watchlist: Vec::new(),
        }
    }
}

/// Market data service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Base URL of the bar service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Number of daily bars to request
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_lookback_days() -> u32 {
    252
}
fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            lookback_days: default_lookback_days(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Prometheus exporter port; metrics disabled when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            metrics_port: None,
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

/// Per-strategy configuration sections
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StrategiesConfig {
    #[serde(default)]
    pub moving_average: MaSettings,
    #[serde(default)]
    pub rsi: RsiSettings,
}

/// Moving average crossover settings
#[derive(Debug, Clone, Deserialize)]
pub struct MaSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_fast_period")]
    pub fast_period: usize,
    #[serde(default = "default_slow_period")]
    pub slow_period: usize,
    #[serde(default = "default_ma_position_size_pct")]
    pub position_size_pct: f64,
    #[serde(default = "default_min_volume")]
    pub min_volume: f64,
}

fn default_true() -> bool {
    true
}
fn default_fast_period() -> usize {
    10
}
fn default_slow_period() -> usize {
    20
}
fn default_ma_position_size_pct() -> f64 {
    0.05
}
fn default_min_volume() -> f64 {
    100_000.0
}

impl Default for MaSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            fast_period: default_fast_period(),
            slow_period: default_slow_period(),
            position_size_pct: default_ma_position_size_pct(),
            min_volume: default_min_volume(),
        }
    }
}

impl From<&MaSettings> for MaCrossoverParams {
    fn from(settings: &MaSettings) -> Self {
        Self {
            fast_period: settings.fast_period,
            slow_period: settings.slow_period,
            position_size_pct: settings.position_size_pct,
            min_volume: settings.min_volume,
        }
    }
}

/// RSI mean reversion settings
#[derive(Debug, Clone, Deserialize)]
pub struct RsiSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
    #[serde(default = "default_oversold")]
    pub oversold_threshold: f64,
    #[serde(default = "default_overbought")]
    pub overbought_threshold: f64,
    #[serde(default = "default_rsi_position_size_pct")]
    pub position_size_pct: f64,
    #[serde(default = "default_min_volume")]
    pub min_volume: f64,
}

fn default_rsi_period() -> usize {
    14
}
fn default_oversold() -> f64 {
    30.0
}
fn default_overbought() -> f64 {
    70.0
}
fn default_rsi_position_size_pct() -> f64 {
    0.03
}

impl Default for RsiSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            rsi_period: default_rsi_period(),
            oversold_threshold: default_oversold(),
            overbought_threshold: default_overbought(),
            position_size_pct: default_rsi_position_size_pct(),
            min_volume: default_min_volume(),
        }
    }
}

impl From<&RsiSettings> for RsiParams {
    fn from(settings: &RsiSettings) -> Self {
        Self {
            rsi_period: settings.rsi_period,
            oversold_threshold: settings.oversold_threshold,
            overbought_threshold: settings.overbought_threshold,
            position_size_pct: settings.position_size_pct,
            min_volume: settings.min_volume,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
