use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::types::Symbol;

/// 已納入宇宙的證券
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Security {
    pub symbol: Symbol,
    pub price: f64,
    /// 是否持有部位
    pub invested: bool,
}

impl Security {
    pub fn new(symbol: impl Into<Symbol>, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            invested: false,
        }
    }

    pub fn invested(mut self, invested: bool) -> Self {
        self.invested = invested;
        self
    }
}

/// 宇宙變動：新增與移除的證券
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityChanges {
    pub added: Vec<Security>,
    pub removed: Vec<Security>,
}

impl SecurityChanges {
    pub fn new(added: Vec<Security>, removed: Vec<Security>) -> Self {
        Self { added, removed }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// 比較前後兩個代碼集合，產生變動
    ///
    /// `lookup` 負責把代碼補齊為完整的證券資訊（價格、持倉狀態）。
    pub fn diff<F>(previous: &BTreeSet<Symbol>, next: &BTreeSet<Symbol>, mut lookup: F) -> Self
    where
        F: FnMut(&Symbol) -> Security,
    {
        let added = next.difference(previous).map(&mut lookup).collect();
        let removed = previous.difference(next).map(&mut lookup).collect();
        Self { added, removed }
    }
}
