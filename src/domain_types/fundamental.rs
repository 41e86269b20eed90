use serde::{Deserialize, Serialize};

use super::sector::MorningstarSector;
use super::types::Symbol;

/// 基本面篩選記錄（粗選與精選共用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fundamental {
    pub symbol: Symbol,
    pub price: f64,
    pub volume: f64,
    pub dollar_volume: f64,
    pub has_fundamental_data: bool,
    pub market: String,
    /// Morningstar 板塊代碼，無分類時為 None
    pub sector_code: Option<u32>,
}

impl Fundamental {
    /// 建立記錄，成交金額由價格乘以成交量得出
    pub fn new(symbol: impl Into<Symbol>, price: f64, volume: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            volume,
            dollar_volume: price * volume,
            has_fundamental_data: true,
            market: "usa".to_string(),
            sector_code: None,
        }
    }

    pub fn with_sector(mut self, sector: MorningstarSector) -> Self {
        self.sector_code = Some(sector.code());
        self
    }

    pub fn with_sector_code(mut self, code: u32) -> Self {
        self.sector_code = Some(code);
        self
    }

    pub fn with_market(mut self, market: impl Into<String>) -> Self {
        self.market = market.into();
        self
    }

    pub fn without_fundamental_data(mut self) -> Self {
        self.has_fundamental_data = false;
        self
    }

    /// 已知的 Morningstar 板塊
    pub fn sector(&self) -> Option<MorningstarSector> {
        self.sector_code
            .and_then(|code| MorningstarSector::from_code(code).ok())
    }
}
