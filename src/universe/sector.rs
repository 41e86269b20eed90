//! 板塊均衡宇宙：各 Morningstar 板塊依成交金額各取前 N 名

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use super::sort_by_dollar_volume_desc;
use super::traits::{UniverseSelection, UniverseSelectionModel};
use crate::algorithm::AlgorithmContext;
use crate::domain_types::{Fundamental, MorningstarSector, Symbol};

/// 板塊宇宙配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorUniverseConfig {
    /// 價格下限（不含）
    pub min_price: f64,
    /// 價格上限（含）
    pub max_price: f64,
    /// 每個板塊保留的代碼數量
    pub portfolio_size: usize,
    pub market: String,
    /// 參與選股的板塊，輸出依此順序串接
    pub sectors: Vec<MorningstarSector>,
}

impl Default for SectorUniverseConfig {
    fn default() -> Self {
        Self {
            min_price: 10.0,
            max_price: 1_000.0,
            portfolio_size: 10,
            market: "usa".to_string(),
            sectors: MorningstarSector::ALL.to_vec(),
        }
    }
}

/// 板塊均衡宇宙選擇模型
#[derive(Debug, Clone, Default)]
pub struct SectorUniverseSelectionModel {
    config: SectorUniverseConfig,
}

impl SectorUniverseSelectionModel {
    pub fn new(config: SectorUniverseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SectorUniverseConfig {
        &self.config
    }

    /// 依板塊分組後的選股結果，順序與配置中的板塊一致
    pub fn select_by_sector(&self, fundamentals: &[Fundamental]) -> Vec<(MorningstarSector, Vec<Symbol>)> {
        let mut groups: HashMap<MorningstarSector, Vec<&Fundamental>> = HashMap::new();

        for record in fundamentals {
            if !record.has_fundamental_data || record.market != self.config.market {
                continue;
            }
            let Some(sector) = record.sector() else {
                continue;
            };
            if !self.config.sectors.contains(&sector) {
                continue;
            }
            groups.entry(sector).or_default().push(record);
        }

        let mut result = Vec::new();
        for sector in &self.config.sectors {
            let Some(records) = groups.get(sector) else {
                continue;
            };

            let mut in_range: Vec<&Fundamental> = records
                .iter()
                .copied()
                .filter(|f| self.config.min_price < f.price && f.price <= self.config.max_price)
                .collect();
            sort_by_dollar_volume_desc(&mut in_range);

            let top: Vec<Symbol> = in_range
                .into_iter()
                .take(self.config.portfolio_size)
                .map(|f| f.symbol.clone())
                .collect();

            debug!(
                "從 {} 選出 {} 檔: {:?}",
                sector.name(),
                top.len(),
                top.iter().map(|s| s.value()).collect::<Vec<_>>()
            );
            result.push((*sector, top));
        }

        result
    }
}

impl UniverseSelectionModel for SectorUniverseSelectionModel {
    fn name(&self) -> &str {
        "SectorUniverseSelectionModel"
    }

    fn select_coarse(&mut self, _ctx: &AlgorithmContext, coarse: &[Fundamental]) -> UniverseSelection {
        let symbols = self
            .select_by_sector(coarse)
            .into_iter()
            .flat_map(|(_, symbols)| symbols)
            .collect();
        UniverseSelection::Symbols(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn record(symbol: &str, price: f64, volume: f64, sector: MorningstarSector) -> Fundamental {
        Fundamental::new(symbol, price, volume).with_sector(sector)
    }

    #[test]
    fn test_output_follows_sector_order() {
        let fundamentals = vec![
            record("TECH", 100.0, 10.0, MorningstarSector::Technology),
            record("MAT", 100.0, 10.0, MorningstarSector::BasicMaterials),
            record("NRG", 100.0, 10.0, MorningstarSector::Energy),
        ];

        let mut model = SectorUniverseSelectionModel::default();
        let selection = model.select_coarse(&AlgorithmContext::new(Utc::now()), &fundamentals);
        let symbols: Vec<&str> = selection.symbols().unwrap().iter().map(|s| s.value()).collect();

        assert_eq!(symbols, vec!["MAT", "NRG", "TECH"]);
    }

    #[rstest]
    #[case(10.0, false)]
    #[case(10.01, true)]
    #[case(1_000.0, true)]
    #[case(1_000.01, false)]
    fn test_price_bounds(#[case] price: f64, #[case] selected: bool) {
        let fundamentals = vec![record("X", price, 10.0, MorningstarSector::Utilities)];
        let model = SectorUniverseSelectionModel::default();

        let groups = model.select_by_sector(&fundamentals);
        let count: usize = groups.iter().map(|(_, s)| s.len()).sum();
        assert_eq!(count == 1, selected);
    }

    #[test]
    fn test_excludes_foreign_market_and_unknown_sector() {
        let fundamentals = vec![
            record("UK", 100.0, 10.0, MorningstarSector::Energy).with_market("gbr"),
            Fundamental::new("NOSECTOR", 100.0, 10.0),
            Fundamental::new("BADCODE", 100.0, 10.0).with_sector_code(999),
            record("NOFUND", 100.0, 10.0, MorningstarSector::Energy).without_fundamental_data(),
            record("OK", 100.0, 10.0, MorningstarSector::Energy),
        ];

        let model = SectorUniverseSelectionModel::default();
        let groups = model.select_by_sector(&fundamentals);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, MorningstarSector::Energy);
        assert_eq!(groups[0].1, vec![Symbol::from("OK")]);
    }

    #[test]
    fn test_respects_configured_sector_subset() {
        let config = SectorUniverseConfig {
            sectors: vec![MorningstarSector::Healthcare],
            ..Default::default()
        };
        let fundamentals = vec![
            record("HC", 100.0, 10.0, MorningstarSector::Healthcare),
            record("TECH", 100.0, 10.0, MorningstarSector::Technology),
        ];

        let groups = SectorUniverseSelectionModel::new(config).select_by_sector(&fundamentals);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].1, vec![Symbol::from("HC")]);
    }
}
