mod common;

use chrono::{TimeZone, Utc};
use common::{day, flat_then_jump};
use std::fs;
use strategy_lab::algorithm::{
    AlgorithmContext, LiquidationRequest, MeanReversionAlgorithm, SectorUniverseAlgorithm,
    StrategyRunner,
};
use strategy_lab::data_provider::{load_bars, load_fundamentals, InMemoryHistoryProvider};
use strategy_lab::domain_types::{Fundamental, InsightDirection, Symbol};
use strategy_lab::portfolio::PortfolioTarget;
use tempfile::tempdir;

#[test]
fn test_mean_reversion_flow_from_csv() {
    let dir = tempdir().unwrap();
    let fundamentals_path = dir.path().join("fundamentals.csv");
    let bars_path = dir.path().join("bars.csv");

    fs::write(
        &fundamentals_path,
        "symbol,price,volume\nDIP,90,1000000\nPOP,110,1000000\nPENNY,2,99999999\n",
    )
    .unwrap();

    let mut csv = String::from("time,symbol,close\n");
    for bar in flat_then_jump("DIP", 100.0, 90.0, 30)
        .into_iter()
        .chain(flat_then_jump("POP", 100.0, 110.0, 30))
    {
        csv.push_str(&format!("{},{},{}\n", bar.time.format("%Y-%m-%d"), bar.symbol, bar.close));
    }
    fs::write(&bars_path, csv).unwrap();

    let fundamentals = load_fundamentals(&fundamentals_path).unwrap();
    let provider = InMemoryHistoryProvider::from_bars(load_bars(&bars_path).unwrap());

    let mut runner = StrategyRunner::new(MeanReversionAlgorithm::default()).unwrap();
    let report = runner
        .step(&AlgorithmContext::new(day(29)), &fundamentals, &provider)
        .unwrap();

    assert!(report.universe_changed);
    assert_eq!(report.universe, vec![Symbol::from("DIP"), Symbol::from("POP")]);
    assert_eq!(report.insights.len(), 2);
    assert_eq!(
        report.targets,
        vec![
            PortfolioTarget::new(Symbol::from("DIP"), 0.5),
            PortfolioTarget::new(Symbol::from("POP"), -0.5),
        ]
    );

    // 報告可序列化為 JSON
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["algorithm"], "MeanReversionAlgorithm");
    assert_eq!(json["insights"][0]["direction"], serde_json::json!(InsightDirection::Up));
}

#[test]
fn test_mean_reversion_universe_held_within_month() {
    let provider = InMemoryHistoryProvider::from_bars(flat_then_jump("DIP", 100.0, 90.0, 30));
    let mut runner = StrategyRunner::new(MeanReversionAlgorithm::default()).unwrap();

    let fundamentals = vec![Fundamental::new("DIP", 90.0, 1_000_000.0)];
    let first = runner
        .step(&AlgorithmContext::new(day(28)), &fundamentals, &provider)
        .unwrap();
    assert!(first.universe_changed);

    let second = runner
        .step(&AlgorithmContext::new(day(29)), &[], &provider)
        .unwrap();
    assert!(!second.universe_changed);
    assert!(second.changes.is_empty());
    assert_eq!(second.universe, vec![Symbol::from("DIP")]);
    assert_eq!(second.insights.len(), 1);
}

#[test]
fn test_sector_flow_liquidates_invested_removals() {
    let mut runner = StrategyRunner::new(SectorUniverseAlgorithm::default()).unwrap();
    let provider = InMemoryHistoryProvider::new();
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();

    let first = vec![
        Fundamental::new("XOM", 100.0, 1_000.0).with_sector_code(309),
        Fundamental::new("CVX", 150.0, 1_000.0).with_sector_code(309),
        Fundamental::new("MSFT", 400.0, 1_000.0).with_sector_code(311),
    ];
    let report = runner
        .step(&AlgorithmContext::new(start), &first, &provider)
        .unwrap();
    assert_eq!(report.universe.len(), 3);
    assert!(report.insights.is_empty());

    // CVX 超過價格上限、MSFT 失去分類
    let second = vec![
        Fundamental::new("XOM", 100.0, 1_000.0).with_sector_code(309),
        Fundamental::new("CVX", 1_500.0, 1_000.0).with_sector_code(309),
        Fundamental::new("MSFT", 400.0, 1_000.0),
    ];
    let ctx = AlgorithmContext::new(start + chrono::Duration::days(1))
        .with_holdings(vec![Symbol::from("CVX")]);
    let report = runner.step(&ctx, &second, &provider).unwrap();

    assert_eq!(report.universe, vec![Symbol::from("XOM")]);
    assert_eq!(report.changes.removed.len(), 2);
    assert_eq!(report.liquidations, vec![LiquidationRequest::new(Symbol::from("CVX"))]);
    assert_eq!(runner.active_symbols().len(), 1);
}

#[test]
fn test_mean_reversion_position_closed_when_insight_expires() {
    let mut bars = flat_then_jump("DIP", 100.0, 90.0, 30);
    bars.push(strategy_lab::domain_types::Bar::new(day(30), "DIP", 100.0));
    let provider = InMemoryHistoryProvider::from_bars(bars);
    let fundamentals = vec![Fundamental::new("DIP", 90.0, 1_000_000.0)];

    let mut runner = StrategyRunner::new(MeanReversionAlgorithm::default()).unwrap();
    let opened = runner
        .step(&AlgorithmContext::new(day(29)), &fundamentals, &provider)
        .unwrap();
    assert_eq!(opened.targets, vec![PortfolioTarget::new(Symbol::from("DIP"), 1.0)]);

    // 價格回到均值，不再有新洞見，一日期的洞見於 day 30 到期
    let closed = runner
        .step(&AlgorithmContext::new(day(30)), &fundamentals, &provider)
        .unwrap();
    assert!(closed.insights.is_empty());
    assert_eq!(closed.targets, vec![PortfolioTarget::new(Symbol::from("DIP"), 0.0)]);
}
