//! End-to-end risk analysis tests: snapshot file through to alerts

use alpha_desk::data::{Bar, BarSeries, MarketDataProvider};
use alpha_desk::portfolio::SnapshotFile;
use alpha_desk::risk::{
    AlertLog, RiskAlert, RiskLevel, RiskManager, RiskReport, PORTFOLIO_SYMBOL,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

struct FixedMarket(HashMap<String, BarSeries>);

#[async_trait]
impl MarketDataProvider for FixedMarket {
    async fn get_bars(&self, symbols: &[String]) -> anyhow::Result<HashMap<String, BarSeries>> {
        Ok(self
            .0
            .iter()
            .filter(|(symbol, _)| symbols.contains(symbol))
            .map(|(symbol, bars)| (symbol.clone(), bars.clone()))
            .collect())
    }
}

fn wobbling_bars(n: usize) -> BarSeries {
    let start = Utc::now() - Duration::days(n as i64);
    BarSeries::new(
        (0..n)
            .map(|i| Bar {
                timestamp: start + Duration::days(i as i64),
                close: Decimal::from_f64(100.0 + if i % 2 == 0 { 0.5 } else { -0.5 }).unwrap(),
                volume: dec!(100000),
            })
            .collect(),
    )
}

fn write_snapshot(
    net_liquidation: f64,
    buying_power: f64,
    positions: &[(&str, f64)],
) -> tempfile::NamedTempFile {
    let positions_json: Vec<String> = positions
        .iter()
        .map(|(symbol, market_value)| {
            format!(
                r#"{{"Symbol": "{}", "SecType": "STK", "Position": 100,
                    "Market Value": {}, "Average Cost": 100.0, "Unrealized PnL": 0.0}}"#,
                symbol, market_value
            )
        })
        .collect();

    let json = format!(
        r#"{{
            "account_summary": {{
                "NetLiquidation": {{"value": "{}", "currency": "USD"}},
                "TotalCashValue": {{"value": "10000", "currency": "USD"}},
                "BuyingPower": {{"value": "{}", "currency": "USD"}},
                "UnrealizedPnL": {{"value": "2500", "currency": "USD"}}
            }},
            "positions": [{}]
        }}"#,
        net_liquidation,
        buying_power,
        positions_json.join(",")
    );

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

fn manager_for(
    snapshot: &tempfile::NamedTempFile,
    bars: HashMap<String, BarSeries>,
) -> RiskManager {
    RiskManager::new(
        Arc::new(SnapshotFile::new(snapshot.path())),
        Arc::new(FixedMarket(bars)),
    )
}

fn analysis(report: RiskReport) -> alpha_desk::risk::RiskAnalysis {
    match report {
        RiskReport::Analyzed(a) => a,
        RiskReport::NoPositions => panic!("expected analyzed report"),
    }
}

#[tokio::test]
async fn empty_snapshot_reports_no_positions() {
    let snapshot = write_snapshot(100_000.0, 50_000.0, &[]);
    let mut manager = manager_for(&snapshot, HashMap::new());

    let report = manager.analyze().await.unwrap();
    assert!(matches!(report, RiskReport::NoPositions));
}

#[tokio::test]
async fn concentrated_position_raises_single_high_alert() {
    // One position at 20% of net liquidation against the 15% default limit
    let snapshot = write_snapshot(
        100_000.0,
        60_000.0,
        &[("HEAVY", 20_000.0), ("LIGHT", 4_000.0)],
    );
    let mut bars = HashMap::new();
    bars.insert("HEAVY".to_string(), wobbling_bars(60));
    bars.insert("LIGHT".to_string(), wobbling_bars(60));

    let mut manager = manager_for(&snapshot, bars);
    let result = analysis(manager.analyze().await.unwrap());

    let concentration: Vec<&RiskAlert> = result
        .alerts
        .iter()
        .filter(|a| a.risk_type == "Position Concentration")
        .collect();
    assert_eq!(concentration.len(), 1);
    assert_eq!(concentration[0].symbol, "HEAVY");
    assert_eq!(concentration[0].level, RiskLevel::High);
    assert!((concentration[0].threshold - 0.15).abs() < 1e-9);

    // The same breach shows up as the leading recommendation
    assert!(result.recommendations[0].contains("HEAVY"));
}

#[tokio::test]
async fn margin_exhaustion_raises_critical_alert() {
    // (100000 - 5000) / 100000 = 0.95 utilization against the 0.8 limit
    let snapshot = write_snapshot(100_000.0, 5_000.0, &[("AAPL", 10_000.0)]);
    let mut manager = manager_for(&snapshot, HashMap::new());

    let result = analysis(manager.analyze().await.unwrap());
    assert!((result.portfolio.margin_utilization - 0.95).abs() < 1e-9);

    let critical: Vec<&RiskAlert> = result
        .alerts
        .iter()
        .filter(|a| a.level == RiskLevel::Critical)
        .collect();
    assert_eq!(critical.len(), 1);
    assert_eq!(critical[0].risk_type, "High Margin Usage");
    assert_eq!(critical[0].symbol, PORTFOLIO_SYMBOL);
    assert!(critical[0].action_required);
}

#[tokio::test]
async fn repeated_analysis_is_idempotent_on_metrics() {
    let snapshot = write_snapshot(100_000.0, 60_000.0, &[("AAPL", 12_000.0)]);
    let mut bars = HashMap::new();
    bars.insert("AAPL".to_string(), wobbling_bars(120));

    let mut manager = manager_for(&snapshot, bars);
    let first = analysis(manager.analyze().await.unwrap());
    let second = analysis(manager.analyze().await.unwrap());

    assert_eq!(first.risk_score, second.risk_score);
    assert_eq!(
        first.position_risks[0].volatility,
        second.position_risks[0].volatility
    );
    assert_eq!(first.position_risks[0].var_1d, second.position_risks[0].var_1d);
    assert_eq!(
        first.position_risks[0].risk_score,
        second.position_risks[0].risk_score
    );
}

#[tokio::test]
async fn scores_stay_in_documented_ranges() {
    let snapshot = write_snapshot(
        50_000.0,
        1_000.0,
        &[("A", 30_000.0), ("B", 15_000.0), ("C", 5_000.0)],
    );
    let mut bars = HashMap::new();
    for symbol in ["A", "B", "C"] {
        bars.insert(symbol.to_string(), wobbling_bars(90));
    }

    let mut manager = manager_for(&snapshot, bars);
    let result = analysis(manager.analyze().await.unwrap());

    assert!(result.risk_score >= 0.0 && result.risk_score <= 100.0);
    for risk in &result.position_risks {
        assert!(risk.risk_score >= 0.0 && risk.risk_score <= 100.0);
        assert!(risk.portfolio_weight >= 0.0);
        assert_eq!(risk.beta, 1.0);
    }
}

#[test]
fn alert_log_prunes_hour_old_entries() {
    let now = Utc::now();
    let mut log = AlertLog::new();

    let stale = RiskAlert {
        symbol: "OLD".to_string(),
        risk_type: "Position Concentration".to_string(),
        level: RiskLevel::High,
        message: "stale".to_string(),
        value: 0.2,
        threshold: 0.15,
        timestamp: now - Duration::minutes(61),
        action_required: true,
    };
    let fresh = RiskAlert {
        symbol: "NEW".to_string(),
        timestamp: now - Duration::minutes(59),
        ..stale.clone()
    };

    log.push(stale);
    log.push(fresh);
    log.prune(now - Duration::hours(1));

    let remaining = log.recent(10);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].symbol, "NEW");
}
