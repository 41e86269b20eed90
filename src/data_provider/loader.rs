//! CSV 數據加載器

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use super::{DataProviderError, DataProviderResult};
use crate::domain_types::{Bar, Fundamental, Symbol};

/// K線 CSV 行：`time,symbol,close`
#[derive(Debug, Deserialize)]
struct BarRow {
    time: String,
    symbol: String,
    close: f64,
}

/// 基本面 CSV 行
#[derive(Debug, Deserialize)]
struct FundamentalRow {
    symbol: String,
    price: f64,
    volume: f64,
    #[serde(default)]
    dollar_volume: Option<f64>,
    #[serde(default = "default_has_fundamental_data")]
    has_fundamental_data: bool,
    #[serde(default = "default_market")]
    market: String,
    #[serde(default)]
    sector_code: Option<u32>,
}

fn default_has_fundamental_data() -> bool {
    true
}

fn default_market() -> String {
    "usa".to_string()
}

/// 解析 RFC 3339 或 `YYYY-MM-DD`（視為 UTC 零時）
pub fn parse_time(value: &str) -> DataProviderResult<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DataProviderError::InvalidTime(value.to_string()))
}

/// 從任意來源讀取K線
pub fn read_bars<R: Read>(reader: R) -> DataProviderResult<Vec<Bar>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars = Vec::new();
    for row in csv_reader.deserialize::<BarRow>() {
        let row = row?;
        if row.symbol.is_empty() {
            return Err(DataProviderError::InvalidRecord {
                line: bars.len() as u64 + 2,
                message: "缺少代碼".to_string(),
            });
        }
        bars.push(Bar {
            time: parse_time(&row.time)?,
            symbol: Symbol::new(row.symbol),
            close: row.close,
        });
    }

    debug!("讀取 {} 根K線", bars.len());
    Ok(bars)
}

/// 從任意來源讀取基本面記錄
pub fn read_fundamentals<R: Read>(reader: R) -> DataProviderResult<Vec<Fundamental>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in csv_reader.deserialize::<FundamentalRow>() {
        let row = row?;
        records.push(Fundamental {
            symbol: Symbol::new(row.symbol),
            price: row.price,
            volume: row.volume,
            dollar_volume: row.dollar_volume.unwrap_or(row.price * row.volume),
            has_fundamental_data: row.has_fundamental_data,
            market: row.market,
            sector_code: row.sector_code,
        });
    }

    debug!("讀取 {} 筆基本面記錄", records.len());
    Ok(records)
}

/// 從檔案加載K線
pub fn load_bars(path: impl AsRef<Path>) -> DataProviderResult<Vec<Bar>> {
    let path = path.as_ref();
    info!("加載K線檔案: {}", path.display());
    read_bars(File::open(path)?)
}

/// 從檔案加載基本面記錄
pub fn load_fundamentals(path: impl AsRef<Path>) -> DataProviderResult<Vec<Fundamental>> {
    let path = path.as_ref();
    info!("加載基本面檔案: {}", path.display());
    read_fundamentals(File::open(path)?)
}
