use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{AlgorithmError, AlgorithmResult};
use crate::domain_types::Resolution;

/// 演算法基本設定：回測區間、初始資金與數據解析度
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmSettings {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cash: f64,
    pub resolution: Resolution,
}

impl AlgorithmSettings {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, cash: f64, resolution: Resolution) -> Self {
        Self {
            start_date,
            end_date,
            cash,
            resolution,
        }
    }

    /// 檢查區間與資金
    pub fn validate(&self) -> AlgorithmResult<()> {
        if self.start_date >= self.end_date {
            return Err(AlgorithmError::InvalidSettings(format!(
                "開始日期 {} 必須早於結束日期 {}",
                self.start_date, self.end_date
            )));
        }
        if self.cash.is_nan() || self.cash <= 0.0 {
            return Err(AlgorithmError::InvalidSettings(format!(
                "初始資金必須大於零: {}",
                self.cash
            )));
        }
        Ok(())
    }

    /// 指定時間是否落在回測區間內（起訖日皆含）
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        let date = time.date_naive();
        date >= self.start_date && date <= self.end_date
    }
}
