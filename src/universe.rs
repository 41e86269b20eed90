//! 宇宙選擇模組
//!
//! 從基本面記錄篩選可交易的代碼集合。

pub mod traits;
pub mod liquid;
pub mod sector;

pub use traits::{UniverseSelection, UniverseSelectionModel};
pub use liquid::{LiquidUniverseConfig, LiquidUniverseSelectionModel};
pub use sector::{SectorUniverseConfig, SectorUniverseSelectionModel};

use crate::domain_types::Fundamental;

/// 依成交金額由大到小排序（穩定排序）
pub(crate) fn sort_by_dollar_volume_desc(records: &mut [&Fundamental]) {
    records.sort_by(|a, b| b.dollar_volume.total_cmp(&a.dollar_volume));
}
