//! 數據提供模組
//!
//! 歷史價格與基本面數據由宿主平台提供，本模組只定義取數介面，
//! 並附帶記憶體實作與 CSV 加載器供命令列工具及測試使用。

pub mod history;
pub mod loader;

pub use history::{HistoryProvider, InMemoryHistoryProvider};
pub use loader::{load_bars, load_fundamentals, parse_time, read_bars, read_fundamentals};

use thiserror::Error;

/// 數據提供錯誤
#[derive(Error, Debug)]
pub enum DataProviderError {
    #[error("讀取檔案失敗: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 解析失敗: {0}")]
    Csv(#[from] csv::Error),

    #[error("無效的時間格式: {0}")]
    InvalidTime(String),

    #[error("無效的記錄 (第 {line} 行): {message}")]
    InvalidRecord { line: u64, message: String },
}

/// 數據提供結果類型
pub type DataProviderResult<T> = Result<T, DataProviderError>;
