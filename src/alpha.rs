//! Alpha 模組
//!
//! 將歷史價格轉換為交易洞見。

pub mod traits;
pub mod mean_reversion;

pub use traits::AlphaModel;
pub use mean_reversion::{MeanReversionAlphaModel, MeanReversionConfig};
