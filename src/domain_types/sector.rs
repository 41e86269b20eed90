use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::{DomainError, Result};

/// Morningstar 板塊分類，序列化為板塊代碼
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum MorningstarSector {
    BasicMaterials,        // 101
    ConsumerCyclical,      // 102
    FinancialServices,     // 103
    RealEstate,            // 104
    ConsumerDefensive,     // 205
    Healthcare,            // 206
    Utilities,             // 207
    CommunicationServices, // 308
    Energy,                // 309
    Industrials,           // 310
    Technology,            // 311
}

impl MorningstarSector {
    /// 依代碼排序的全部板塊
    pub const ALL: [MorningstarSector; 11] = [
        MorningstarSector::BasicMaterials,
        MorningstarSector::ConsumerCyclical,
        MorningstarSector::FinancialServices,
        MorningstarSector::RealEstate,
        MorningstarSector::ConsumerDefensive,
        MorningstarSector::Healthcare,
        MorningstarSector::Utilities,
        MorningstarSector::CommunicationServices,
        MorningstarSector::Energy,
        MorningstarSector::Industrials,
        MorningstarSector::Technology,
    ];

    /// Morningstar 板塊代碼
    pub fn code(&self) -> u32 {
        match self {
            MorningstarSector::BasicMaterials => 101,
            MorningstarSector::ConsumerCyclical => 102,
            MorningstarSector::FinancialServices => 103,
            MorningstarSector::RealEstate => 104,
            MorningstarSector::ConsumerDefensive => 205,
            MorningstarSector::Healthcare => 206,
            MorningstarSector::Utilities => 207,
            MorningstarSector::CommunicationServices => 308,
            MorningstarSector::Energy => 309,
            MorningstarSector::Industrials => 310,
            MorningstarSector::Technology => 311,
        }
    }

    /// 從代碼轉換
    pub fn from_code(code: u32) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|sector| sector.code() == code)
            .ok_or(DomainError::InvalidSectorCode(code))
    }

    /// 板塊顯示名稱
    pub fn name(&self) -> &'static str {
        match self {
            MorningstarSector::BasicMaterials => "Basic Materials",
            MorningstarSector::ConsumerCyclical => "Consumer Cyclical",
            MorningstarSector::FinancialServices => "Financial Services",
            MorningstarSector::RealEstate => "Real Estate",
            MorningstarSector::ConsumerDefensive => "Consumer Defensive",
            MorningstarSector::Healthcare => "Healthcare",
            MorningstarSector::Utilities => "Utilities",
            MorningstarSector::CommunicationServices => "Communication Services",
            MorningstarSector::Energy => "Energy",
            MorningstarSector::Industrials => "Industrials",
            MorningstarSector::Technology => "Technology",
        }
    }
}

impl fmt::Display for MorningstarSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TryFrom<u32> for MorningstarSector {
    type Error = DomainError;

    fn try_from(code: u32) -> Result<Self> {
        Self::from_code(code)
    }
}

impl From<MorningstarSector> for u32 {
    fn from(sector: MorningstarSector) -> Self {
        sector.code()
    }
}
