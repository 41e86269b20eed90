//! 流動性宇宙：每月依成交金額選出前 N 名

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::sort_by_dollar_volume_desc;
use super::traits::{UniverseSelection, UniverseSelectionModel};
use crate::algorithm::AlgorithmContext;
use crate::domain_types::Fundamental;

/// 流動性宇宙配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidUniverseConfig {
    /// 價格下限（不含）
    pub min_price: f64,
    /// 保留的代碼數量
    pub top_n: usize,
}

impl Default for LiquidUniverseConfig {
    fn default() -> Self {
        Self {
            min_price: 10.0,
            top_n: 100,
        }
    }
}

/// 流動性宇宙選擇模型
#[derive(Debug, Clone)]
pub struct LiquidUniverseSelectionModel {
    config: LiquidUniverseConfig,
    /// 上次刷新的 (年, 月)
    last_refresh: Option<(i32, u32)>,
}

impl Default for LiquidUniverseSelectionModel {
    fn default() -> Self {
        Self::new(LiquidUniverseConfig::default())
    }
}

impl LiquidUniverseSelectionModel {
    pub fn new(config: LiquidUniverseConfig) -> Self {
        Self {
            config,
            last_refresh: None,
        }
    }

    pub fn config(&self) -> &LiquidUniverseConfig {
        &self.config
    }
}

impl UniverseSelectionModel for LiquidUniverseSelectionModel {
    fn name(&self) -> &str {
        "LiquidUniverseSelectionModel"
    }

    fn select_coarse(&mut self, ctx: &AlgorithmContext, coarse: &[Fundamental]) -> UniverseSelection {
        let month = (ctx.time.year(), ctx.time.month());
        if self.last_refresh == Some(month) {
            debug!("本月已刷新宇宙，沿用上次結果");
            return UniverseSelection::Unchanged;
        }
        self.last_refresh = Some(month);

        let mut filtered: Vec<&Fundamental> = coarse
            .iter()
            .filter(|f| f.has_fundamental_data && f.price > self.config.min_price)
            .collect();
        sort_by_dollar_volume_desc(&mut filtered);

        let selected: Vec<_> = filtered
            .into_iter()
            .take(self.config.top_n)
            .map(|f| f.symbol.clone())
            .collect();

        info!(
            "{}-{:02} 流動性宇宙: {} / {} 檔",
            month.0,
            month.1,
            selected.len(),
            coarse.len()
        );
        UniverseSelection::Symbols(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ctx(year: i32, month: u32, day: u32) -> AlgorithmContext {
        AlgorithmContext::new(Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap())
    }

    fn coarse() -> Vec<Fundamental> {
        vec![
            Fundamental::new("LOW", 5.0, 1_000_000.0),
            Fundamental::new("AAA", 20.0, 100.0),
            Fundamental::new("BBB", 50.0, 100.0),
            Fundamental::new("CCC", 30.0, 100.0).without_fundamental_data(),
            Fundamental::new("DDD", 10.0, 500.0),
        ]
    }

    #[test]
    fn test_filters_and_sorts_by_dollar_volume() {
        let mut model = LiquidUniverseSelectionModel::default();
        let selection = model.select_coarse(&ctx(2020, 1, 2), &coarse());

        let symbols: Vec<&str> = selection.symbols().unwrap().iter().map(|s| s.value()).collect();
        // LOW 價格過低、CCC 無基本面、DDD 價格等於下限被排除
        assert_eq!(symbols, vec!["BBB", "AAA"]);
    }

    #[test]
    fn test_refreshes_once_per_month() {
        let mut model = LiquidUniverseSelectionModel::default();

        assert!(!model.select_coarse(&ctx(2020, 1, 2), &coarse()).is_unchanged());
        assert!(model.select_coarse(&ctx(2020, 1, 31), &coarse()).is_unchanged());
        assert!(!model.select_coarse(&ctx(2020, 2, 3), &coarse()).is_unchanged());
        // 隔年同月份仍需刷新
        assert!(!model.select_coarse(&ctx(2021, 2, 1), &coarse()).is_unchanged());
    }

    #[test]
    fn test_top_n_limit() {
        let mut model = LiquidUniverseSelectionModel::new(LiquidUniverseConfig {
            min_price: 0.0,
            top_n: 2,
        });
        let selection = model.select(&ctx(2020, 1, 2), &coarse());
        let symbols: Vec<&str> = selection.symbols().unwrap().iter().map(|s| s.value()).collect();
        // BBB 與 DDD 成交金額相同，維持輸入順序
        assert_eq!(symbols, vec!["LOW", "BBB"]);
    }
}
