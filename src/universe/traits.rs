use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::algorithm::AlgorithmContext;
use crate::domain_types::{Fundamental, Symbol};

/// 宇宙選擇結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UniverseSelection {
    /// 沿用上一次的宇宙
    Unchanged,
    Symbols(Vec<Symbol>),
}

impl UniverseSelection {
    pub fn symbols(&self) -> Option<&[Symbol]> {
        match self {
            UniverseSelection::Unchanged => None,
            UniverseSelection::Symbols(symbols) => Some(symbols),
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, UniverseSelection::Unchanged)
    }
}

/// 宇宙選擇模型特性
///
/// 先粗選再精選；精選預設全部通過。
pub trait UniverseSelectionModel: Send {
    fn name(&self) -> &str;

    fn select_coarse(&mut self, ctx: &AlgorithmContext, coarse: &[Fundamental]) -> UniverseSelection;

    fn select_fine(&mut self, _ctx: &AlgorithmContext, fine: &[Fundamental]) -> UniverseSelection {
        UniverseSelection::Symbols(fine.iter().map(|f| f.symbol.clone()).collect())
    }

    /// 串接粗選與精選
    fn select(&mut self, ctx: &AlgorithmContext, fundamentals: &[Fundamental]) -> UniverseSelection {
        let coarse = match self.select_coarse(ctx, fundamentals) {
            UniverseSelection::Unchanged => return UniverseSelection::Unchanged,
            UniverseSelection::Symbols(symbols) => symbols,
        };

        let wanted: HashSet<&Symbol> = coarse.iter().collect();
        let mut fine: Vec<Fundamental> = fundamentals
            .iter()
            .filter(|f| wanted.contains(&f.symbol))
            .cloned()
            .collect();

        // 精選輸入維持粗選的排序
        fine.sort_by_key(|f| coarse.iter().position(|s| *s == f.symbol));

        self.select_fine(ctx, &fine)
    }
}
