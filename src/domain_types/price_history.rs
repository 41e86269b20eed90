//! 收盤價矩陣
//!
//! 列為時間（遞增），欄為代碼（排序後）。缺漏觀測值以 NaN 表示。

use chrono::{DateTime, Utc};
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::types::Symbol;

/// 長格式的單根收盤價K線
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: DateTime<Utc>,
    pub symbol: Symbol,
    pub close: f64,
}

impl Bar {
    pub fn new(time: DateTime<Utc>, symbol: impl Into<Symbol>, close: f64) -> Self {
        Self {
            time,
            symbol: symbol.into(),
            close,
        }
    }
}

/// 多代碼共用時間索引的收盤價表
#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistory {
    times: Vec<DateTime<Utc>>,
    symbols: Vec<Symbol>,
    closes: Array2<f64>,
}

impl Default for PriceHistory {
    fn default() -> Self {
        Self::empty()
    }
}

impl PriceHistory {
    pub fn empty() -> Self {
        Self {
            times: Vec::new(),
            symbols: Vec::new(),
            closes: Array2::from_elem((0, 0), f64::NAN),
        }
    }

    /// 將長格式K線展開為矩陣，同一時間同一代碼的重複值以最後一筆為準
    pub fn from_bars<'a, I>(bars: I) -> Self
    where
        I: IntoIterator<Item = &'a Bar>,
    {
        let mut cells: BTreeMap<(DateTime<Utc>, Symbol), f64> = BTreeMap::new();
        let mut times = BTreeSet::new();
        let mut symbols = BTreeSet::new();

        for bar in bars {
            times.insert(bar.time);
            symbols.insert(bar.symbol.clone());
            cells.insert((bar.time, bar.symbol.clone()), bar.close);
        }

        let times: Vec<DateTime<Utc>> = times.into_iter().collect();
        let symbols: Vec<Symbol> = symbols.into_iter().collect();
        let mut closes = Array2::from_elem((times.len(), symbols.len()), f64::NAN);

        for (row, time) in times.iter().enumerate() {
            for (col, symbol) in symbols.iter().enumerate() {
                if let Some(close) = cells.get(&(*time, symbol.clone())) {
                    closes[[row, col]] = *close;
                }
            }
        }

        Self {
            times,
            symbols,
            closes,
        }
    }

    /// 沒有任何觀測值
    pub fn is_empty(&self) -> bool {
        self.times.is_empty() || self.symbols.is_empty()
    }

    pub fn n_rows(&self) -> usize {
        self.times.len()
    }

    pub fn n_cols(&self) -> usize {
        self.symbols.len()
    }

    pub fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn closes(&self) -> &Array2<f64> {
        &self.closes
    }

    pub fn column_index(&self, symbol: &Symbol) -> Option<usize> {
        self.symbols.binary_search(symbol).ok()
    }

    /// 單一代碼的收盤價序列
    pub fn column(&self, symbol: &Symbol) -> Option<ArrayView1<'_, f64>> {
        self.column_index(symbol)
            .map(|idx| self.closes.index_axis(Axis(1), idx))
    }

    /// 單一代碼最新一列的收盤價（可能為 NaN）
    pub fn last_close(&self, symbol: &Symbol) -> Option<f64> {
        let column = self.column(symbol)?;
        column.last().copied()
    }

    /// 只保留每個代碼最後 `rows` 列
    pub fn tail(&self, rows: usize) -> Self {
        let start = self.times.len().saturating_sub(rows);
        Self {
            times: self.times[start..].to_vec(),
            symbols: self.symbols.clone(),
            closes: self.closes.slice(ndarray::s![start.., ..]).to_owned(),
        }
    }
}
