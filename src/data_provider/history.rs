use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use super::DataProviderResult;
use crate::domain_types::{Bar, PriceHistory, Resolution, Symbol};

/// 歷史數據提供者特性 - 由宿主平台實作
pub trait HistoryProvider {
    /// 取得指定代碼截至 `end`（含）的最近 `bars` 根K線
    fn history(
        &self,
        symbols: &[Symbol],
        bars: usize,
        resolution: Resolution,
        end: DateTime<Utc>,
    ) -> DataProviderResult<PriceHistory>;
}

/// 記憶體歷史數據提供者
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistoryProvider {
    resolution: Option<Resolution>,
    bars: BTreeMap<Symbol, Vec<Bar>>,
}

impl InMemoryHistoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// 限定資料的解析度，請求其他解析度時回傳空表
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = Some(resolution);
        self
    }

    /// 從長格式K線建立
    pub fn from_bars(bars: impl IntoIterator<Item = Bar>) -> Self {
        let mut provider = Self::new();
        provider.extend(bars);
        provider
    }

    /// 批量加入K線，並維持每個代碼依時間排序
    pub fn extend(&mut self, bars: impl IntoIterator<Item = Bar>) {
        for bar in bars {
            self.bars.entry(bar.symbol.clone()).or_default().push(bar);
        }
        for series in self.bars.values_mut() {
            series.sort_by_key(|bar| bar.time);
        }
    }

    /// 已知代碼數量
    pub fn symbol_count(&self) -> usize {
        self.bars.len()
    }
}

impl HistoryProvider for InMemoryHistoryProvider {
    fn history(
        &self,
        symbols: &[Symbol],
        bars: usize,
        resolution: Resolution,
        end: DateTime<Utc>,
    ) -> DataProviderResult<PriceHistory> {
        if bars == 0 || symbols.is_empty() {
            return Ok(PriceHistory::empty());
        }
        if self.resolution.is_some_and(|r| r != resolution) {
            debug!("請求的解析度 {} 與數據不符，回傳空表", resolution);
            return Ok(PriceHistory::empty());
        }

        let requested: HashSet<&Symbol> = symbols.iter().collect();
        let mut selected: Vec<&Bar> = Vec::new();

        for (symbol, series) in &self.bars {
            if !requested.contains(symbol) {
                continue;
            }
            let upto = series.partition_point(|bar| bar.time <= end);
            let start = upto.saturating_sub(bars);
            selected.extend(&series[start..upto]);
        }

        // 各代碼時間點不一致時，展開後僅保留最後 `bars` 列
        Ok(PriceHistory::from_bars(selected).tail(bars))
    }
}
