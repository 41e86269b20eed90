#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use strategy_lab::domain_types::{Bar, Fundamental, MorningstarSector};

/// 2020-01-01 起算第 n 天
pub fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
}

/// 由收盤價序列建立連續日線，第一根K線落在 `start`
pub fn daily_bars(symbol: &str, start: i64, closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| Bar::new(day(start + i as i64), symbol, *close))
        .collect()
}

/// 平盤後最後一根跳到 `last`
pub fn flat_then_jump(symbol: &str, flat: f64, last: f64, len: usize) -> Vec<Bar> {
    let mut closes = vec![flat; len - 1];
    closes.push(last);
    daily_bars(symbol, 0, &closes)
}

/// 每個板塊產生 `per_sector` 檔代碼，成交量遞增
pub fn sector_fundamentals(per_sector: usize) -> Vec<Fundamental> {
    MorningstarSector::ALL
        .iter()
        .flat_map(|sector| {
            (0..per_sector).map(move |i| {
                Fundamental::new(
                    format!("{}_{}", sector.code(), i),
                    20.0 + i as f64,
                    1_000.0 * (i + 1) as f64,
                )
                .with_sector(*sector)
            })
        })
        .collect()
}
