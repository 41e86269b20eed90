//! 投資組合建構模組
//!
//! 將洞見轉換為目標持倉比例。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::domain_types::{Insight, InsightDirection, SecurityChanges, Symbol};

/// 目標持倉：佔總權益的帶符號比例
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTarget {
    pub symbol: Symbol,
    pub percent: f64,
}

impl PortfolioTarget {
    pub fn new(symbol: Symbol, percent: f64) -> Self {
        Self { symbol, percent }
    }
}

/// 投資組合建構模型特性
pub trait PortfolioConstructionModel: Send {
    /// 合併新洞見並依 `time` 仍有效的洞見產生目標持倉
    fn create_targets(&mut self, time: DateTime<Utc>, insights: &[Insight]) -> Vec<PortfolioTarget>;

    fn on_securities_changed(&mut self, _changes: &SecurityChanges) {}
}

/// 等權重建構：每個有效的非持平洞見分得 1/n
///
/// 同一代碼以最新生成的洞見為準。洞見到期或代碼被移出宇宙時，
/// 下一次輸出一次 0% 目標。
#[derive(Debug, Clone, Default)]
pub struct EqualWeightingPortfolioConstructionModel {
    active: BTreeMap<Symbol, Insight>,
    removed: BTreeSet<Symbol>,
}

impl EqualWeightingPortfolioConstructionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// 目前仍在追蹤的洞見
    pub fn active_insights(&self) -> impl Iterator<Item = &Insight> {
        self.active.values()
    }
}

impl PortfolioConstructionModel for EqualWeightingPortfolioConstructionModel {
    fn create_targets(&mut self, time: DateTime<Utc>, insights: &[Insight]) -> Vec<PortfolioTarget> {
        for insight in insights {
            match self.active.get(&insight.symbol) {
                Some(existing) if existing.generated_time > insight.generated_time => {}
                _ => {
                    self.active.insert(insight.symbol.clone(), insight.clone());
                }
            }
        }

        let mut flatten = std::mem::take(&mut self.removed);
        self.active.retain(|symbol, insight| {
            let keep = insight.is_active(time);
            if !keep {
                debug!("{} 洞見於 {} 到期", symbol, insight.close_time);
                flatten.insert(symbol.clone());
            }
            keep
        });

        let count = self
            .active
            .values()
            .filter(|i| i.direction != InsightDirection::Flat)
            .count();
        let percent = if count > 0 { 1.0 / count as f64 } else { 0.0 };

        let mut targets: Vec<PortfolioTarget> = self
            .active
            .iter()
            .map(|(symbol, insight)| {
                PortfolioTarget::new(symbol.clone(), insight.direction.sign() * percent)
            })
            .collect();

        for symbol in flatten {
            if !self.active.contains_key(&symbol) {
                targets.push(PortfolioTarget::new(symbol, 0.0));
            }
        }

        targets
    }

    fn on_securities_changed(&mut self, changes: &SecurityChanges) {
        for security in &changes.removed {
            self.active.remove(&security.symbol);
            self.removed.insert(security.symbol.clone());
        }
        for security in &changes.added {
            self.removed.remove(&security.symbol);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_types::Security;
    use chrono::{Duration, TimeZone};

    fn day(offset_days: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap() + Duration::days(offset_days)
    }

    fn insight(symbol: &str, direction: InsightDirection, offset_days: i64) -> Insight {
        Insight::price(
            Symbol::from(symbol),
            Duration::days(1),
            direction,
            None,
            None,
            "test",
            None,
            day(offset_days),
        )
    }

    #[test]
    fn test_equal_weights_with_direction() {
        let mut model = EqualWeightingPortfolioConstructionModel::new();
        let targets = model.create_targets(day(0), &[
            insight("AAA", InsightDirection::Up, 0),
            insight("BBB", InsightDirection::Down, 0),
            insight("CCC", InsightDirection::Flat, 0),
            insight("DDD", InsightDirection::Up, 0),
        ]);

        let by_symbol: BTreeMap<&str, f64> = targets.iter().map(|t| (t.symbol.value(), t.percent)).collect();
        assert!((by_symbol["AAA"] - 1.0 / 3.0).abs() < 1e-12);
        assert!((by_symbol["BBB"] + 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(by_symbol["CCC"], 0.0);
    }

    #[test]
    fn test_latest_insight_wins() {
        let mut model = EqualWeightingPortfolioConstructionModel::new();
        let targets = model.create_targets(day(1), &[
            insight("AAA", InsightDirection::Up, 1),
            insight("AAA", InsightDirection::Down, 0),
        ]);
        assert_eq!(targets, vec![PortfolioTarget::new(Symbol::from("AAA"), 1.0)]);
    }

    #[test]
    fn test_active_insights_carry_over_until_close() {
        let mut model = EqualWeightingPortfolioConstructionModel::new();
        model.create_targets(day(0), &[insight("AAA", InsightDirection::Up, 0)]);

        // 半天後仍有效，與新洞見平分
        let half_day = day(0) + Duration::hours(12);
        let mut fresh = insight("BBB", InsightDirection::Down, 0);
        fresh.generated_time = half_day;
        fresh.close_time = half_day + Duration::days(1);

        let targets = model.create_targets(half_day, &[fresh]);
        assert_eq!(
            targets,
            vec![
                PortfolioTarget::new(Symbol::from("AAA"), 0.5),
                PortfolioTarget::new(Symbol::from("BBB"), -0.5),
            ]
        );
    }

    #[test]
    fn test_expired_insight_is_flattened_once() {
        let mut model = EqualWeightingPortfolioConstructionModel::new();
        model.create_targets(day(0), &[insight("AAA", InsightDirection::Up, 0)]);

        let targets = model.create_targets(day(1), &[]);
        assert_eq!(targets, vec![PortfolioTarget::new(Symbol::from("AAA"), 0.0)]);
        assert_eq!(model.active_insights().count(), 0);
        assert!(model.create_targets(day(2), &[]).is_empty());
    }

    #[test]
    fn test_renewed_insight_is_not_flattened() {
        let mut model = EqualWeightingPortfolioConstructionModel::new();
        model.create_targets(day(0), &[insight("AAA", InsightDirection::Up, 0)]);

        let targets = model.create_targets(day(1), &[insight("AAA", InsightDirection::Up, 1)]);
        assert_eq!(targets, vec![PortfolioTarget::new(Symbol::from("AAA"), 1.0)]);
    }

    #[test]
    fn test_removed_securities_are_flattened_once() {
        let mut model = EqualWeightingPortfolioConstructionModel::new();
        model.create_targets(day(0), &[insight("OLD", InsightDirection::Up, 0)]);
        model.on_securities_changed(&SecurityChanges::new(vec![], vec![Security::new("OLD", 10.0)]));

        let targets = model.create_targets(day(0), &[]);
        assert_eq!(targets, vec![PortfolioTarget::new(Symbol::from("OLD"), 0.0)]);
        assert!(model.create_targets(day(0), &[]).is_empty());
    }
}
