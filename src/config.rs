/// 配置管理模組
///
/// 本模組負責加載、驗證和管理策略配置。
/// 依 `STRATEGY_ENV` 選擇開發或生產環境的配置檔。
// 宣告子模組
pub mod loader;
pub mod manager;
pub mod types;
pub mod validation;

// 重新導出常用組件
pub use loader::{ConfigLoader, Environment};
pub use manager::{get_config, init_config};
pub use types::*;
pub use validation::{ValidationError, ValidationUtils, Validator};
