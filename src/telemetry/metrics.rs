//! Prometheus metrics

use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter and register metric descriptions
///
/// Must be called from within a Tokio runtime; the exporter serves
/// `/metrics` on the given port.
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {}", e))?;

    describe_counter!(
        "alphadesk_signals_generated_total",
        "Unique signals produced per engine run"
    );
    describe_counter!(
        "alphadesk_trades_executed_total",
        "Trades recorded by the execution gate"
    );
    describe_gauge!(
        "alphadesk_portfolio_risk_score",
        "Overall portfolio risk score (0-100)"
    );
    describe_gauge!(
        "alphadesk_margin_utilization",
        "Fraction of net liquidation consumed by margin"
    );
    describe_gauge!(
        "alphadesk_portfolio_volatility",
        "Weight-weighted annualized portfolio volatility"
    );

    tracing::info!(port, "Metrics exporter listening");
    Ok(())
}
