//! 單步執行器
//!
//! 依宿主平台的回呼順序驅動一個演算法：宇宙選擇、宇宙變動、數據到達。

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, instrument};

use super::context::{AlgorithmContext, LiquidationRequest, Slice};
use super::traits::Algorithm;
use super::AlgorithmResult;
use crate::data_provider::HistoryProvider;
use crate::domain_types::{Bar, Fundamental, Insight, Security, SecurityChanges, Symbol};
use crate::portfolio::PortfolioTarget;

/// 單一時間步的完整結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub time: DateTime<Utc>,
    pub algorithm: String,
    /// 本步是否重新選擇了宇宙
    pub universe_changed: bool,
    pub universe: Vec<Symbol>,
    pub changes: SecurityChanges,
    pub liquidations: Vec<LiquidationRequest>,
    pub insights: Vec<Insight>,
    pub targets: Vec<PortfolioTarget>,
}

/// 演算法執行器，持有目前的宇宙
pub struct StrategyRunner<A: Algorithm> {
    algorithm: A,
    active: BTreeSet<Symbol>,
}

impl<A: Algorithm> StrategyRunner<A> {
    /// 建立執行器並初始化演算法
    pub fn new(mut algorithm: A) -> AlgorithmResult<Self> {
        algorithm.initialize()?;
        Ok(Self {
            algorithm,
            active: BTreeSet::new(),
        })
    }

    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    pub fn active_symbols(&self) -> &BTreeSet<Symbol> {
        &self.active
    }

    /// 執行一個時間步
    #[instrument(skip(self, ctx, fundamentals, history), fields(time = %ctx.time))]
    pub fn step(
        &mut self,
        ctx: &AlgorithmContext,
        fundamentals: &[Fundamental],
        history: &dyn HistoryProvider,
    ) -> AlgorithmResult<StepReport> {
        let selection = self.algorithm.select(ctx, fundamentals);
        let universe_changed = !selection.is_unchanged();

        let mut changes = SecurityChanges::default();
        if let Some(symbols) = selection.symbols() {
            let next: BTreeSet<Symbol> = symbols.iter().cloned().collect();
            let prices: HashMap<&Symbol, f64> =
                fundamentals.iter().map(|f| (&f.symbol, f.price)).collect();

            changes = SecurityChanges::diff(&self.active, &next, |symbol| {
                let price = prices.get(symbol).copied().unwrap_or(f64::NAN);
                Security::new(symbol.clone(), price).invested(ctx.is_invested(symbol))
            });
            self.active = next;
        }

        let liquidations = if changes.is_empty() {
            Vec::new()
        } else {
            self.algorithm.on_securities_changed(ctx, &changes)
        };

        let slice = self.current_slice(ctx, history)?;
        debug!("切片包含 {} 根K線", slice.bars.len());
        let output = self.algorithm.on_data(ctx, &slice, history)?;

        info!(
            "{} 完成: 宇宙 {} 檔, 洞見 {} 個, 目標 {} 個, 平倉 {} 檔",
            self.algorithm.name(),
            self.active.len(),
            output.insights.len(),
            output.targets.len(),
            liquidations.len()
        );

        Ok(StepReport {
            time: ctx.time,
            algorithm: self.algorithm.name().to_string(),
            universe_changed,
            universe: self.active.iter().cloned().collect(),
            changes,
            liquidations,
            insights: output.insights,
            targets: output.targets,
        })
    }

    /// 取出目前宇宙在本根K線區間內的最新收盤價
    fn current_slice(
        &self,
        ctx: &AlgorithmContext,
        history: &dyn HistoryProvider,
    ) -> AlgorithmResult<Slice> {
        if self.active.is_empty() {
            return Ok(Slice::default());
        }

        let resolution = self.algorithm.settings().resolution;
        let symbols: Vec<Symbol> = self.active.iter().cloned().collect();
        let latest = history.history(&symbols, 1, resolution, ctx.time)?;

        let Some(&time) = latest.times().last() else {
            return Ok(Slice::default());
        };
        if time <= ctx.time - resolution.to_duration() {
            return Ok(Slice::default());
        }

        let bars: Vec<Bar> = latest
            .symbols()
            .iter()
            .filter_map(|symbol| {
                let close = latest.last_close(symbol)?;
                (!close.is_nan()).then(|| Bar::new(time, symbol.clone(), close))
            })
            .collect();

        Ok(Slice::new(time, bars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{MeanReversionAlgorithm, SectorUniverseAlgorithm};
    use crate::data_provider::InMemoryHistoryProvider;
    use crate::domain_types::{InsightDirection, MorningstarSector};
    use chrono::{Duration, TimeZone};

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
    }

    #[test]
    fn test_sector_step_liquidates_removed_holdings() {
        let mut runner = StrategyRunner::new(SectorUniverseAlgorithm::default()).unwrap();
        let provider = InMemoryHistoryProvider::new();

        let first = vec![
            Fundamental::new("AAA", 50.0, 1_000.0).with_sector(MorningstarSector::Technology),
            Fundamental::new("BBB", 50.0, 2_000.0).with_sector(MorningstarSector::Energy),
        ];
        let report = runner.step(&AlgorithmContext::new(day(1)), &first, &provider).unwrap();
        assert!(report.universe_changed);
        assert_eq!(report.changes.added.len(), 2);
        assert!(report.liquidations.is_empty());

        // AAA 跌破價格下限被移出，且目前持有
        let second = vec![
            Fundamental::new("AAA", 5.0, 1_000.0).with_sector(MorningstarSector::Technology),
            Fundamental::new("BBB", 50.0, 2_000.0).with_sector(MorningstarSector::Energy),
        ];
        let ctx = AlgorithmContext::new(day(2)).with_holdings(vec![Symbol::from("AAA")]);
        let report = runner.step(&ctx, &second, &provider).unwrap();

        assert_eq!(report.universe, vec![Symbol::from("BBB")]);
        assert_eq!(report.changes.removed.len(), 1);
        assert_eq!(report.liquidations, vec![LiquidationRequest::new(Symbol::from("AAA"))]);
    }

    #[test]
    fn test_mean_reversion_step_emits_targets() {
        let mut runner = StrategyRunner::new(MeanReversionAlgorithm::default()).unwrap();

        let mut bars: Vec<Bar> = (0..29).map(|i| Bar::new(day(i), "DIP", 100.0)).collect();
        bars.push(Bar::new(day(29), "DIP", 90.0));
        let provider = InMemoryHistoryProvider::from_bars(bars);

        let fundamentals = vec![Fundamental::new("DIP", 90.0, 1_000_000.0)];
        let report = runner
            .step(&AlgorithmContext::new(day(29)), &fundamentals, &provider)
            .unwrap();

        assert_eq!(report.universe, vec![Symbol::from("DIP")]);
        assert_eq!(report.insights.len(), 1);
        assert_eq!(report.insights[0].direction, InsightDirection::Up);
        assert_eq!(report.targets, vec![PortfolioTarget::new(Symbol::from("DIP"), 1.0)]);
    }

    #[test]
    fn test_stale_bars_produce_empty_slice() {
        let mut runner = StrategyRunner::new(MeanReversionAlgorithm::default()).unwrap();
        let provider = InMemoryHistoryProvider::from_bars(vec![Bar::new(day(0), "OLD", 50.0)]);
        let fundamentals = vec![Fundamental::new("OLD", 50.0, 1_000_000.0)];

        let report = runner
            .step(&AlgorithmContext::new(day(10)), &fundamentals, &provider)
            .unwrap();

        assert!(report.insights.is_empty());
        assert!(report.targets.is_empty());
    }
}
