//! 演算法模組
//!
//! 定義宿主平台的回呼介面（初始化、宇宙選擇、宇宙變動、數據到達），
//! 以及兩個策略與單步執行器。

pub mod context;
pub mod settings;
pub mod traits;
pub mod mean_reversion;
pub mod sector;
pub mod runner;

pub use context::{AlgorithmContext, LiquidationRequest, Slice};
pub use settings::AlgorithmSettings;
pub use traits::{Algorithm, StepOutput};
pub use mean_reversion::MeanReversionAlgorithm;
pub use sector::SectorUniverseAlgorithm;
pub use runner::{StepReport, StrategyRunner};

use thiserror::Error;

use crate::data_provider::DataProviderError;

/// 演算法錯誤
#[derive(Error, Debug)]
pub enum AlgorithmError {
    #[error("無效的演算法設定: {0}")]
    InvalidSettings(String),

    #[error("演算法尚未初始化")]
    NotInitialized,

    #[error("數據錯誤: {0}")]
    Data(#[from] DataProviderError),
}

/// 演算法結果類型
pub type AlgorithmResult<T> = Result<T, AlgorithmError>;
