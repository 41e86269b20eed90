use serde::{Serialize, Deserialize};
use crate::algorithm::{MeanReversionAlgorithm, SectorUniverseAlgorithm, AlgorithmSettings};
use crate::alpha::MeanReversionConfig;
use crate::config::validation::{ValidationError, ValidationUtils, Validator};
use crate::universe::{LiquidUniverseConfig, SectorUniverseConfig};

/// 應用程序配置結構
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationConfig {
    pub log: LogConfig,
    pub algorithm: AlgorithmConfig,
    pub mean_reversion: MeanReversionConfig,
    pub liquid_universe: LiquidUniverseConfig,
    pub sector_universe: SectorUniverseConfig,
}

impl Validator for ApplicationConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證各個部分的配置
        self.log.validate()?;
        self.algorithm.validate()?;
        self.mean_reversion.validate()?;
        self.liquid_universe.validate()?;
        self.sector_universe.validate()?;

        Ok(())
    }
}

/// 日誌配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Validator for LogConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證日誌級別
        ValidationUtils::one_of(
            &self.level.to_lowercase(),
            &["trace", "debug", "info", "warn", "error"].iter().map(|s| s.to_string()).collect::<Vec<String>>(),
            "log.level"
        )?;

        // 驗證日誌格式
        ValidationUtils::one_of(
            &self.format.to_lowercase(),
            &["pretty", "json"].iter().map(|s| s.to_string()).collect::<Vec<String>>(),
            "log.format"
        )?;

        Ok(())
    }
}

/// 兩個策略各自的回測區間與資金設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmConfig {
    pub mean_reversion: AlgorithmSettings,
    pub sector_universe: AlgorithmSettings,
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        Self {
            mean_reversion: MeanReversionAlgorithm::default_settings(),
            sector_universe: SectorUniverseAlgorithm::default_settings(),
        }
    }
}

impl Validator for AlgorithmConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_settings(&self.mean_reversion, "algorithm.mean_reversion")?;
        validate_settings(&self.sector_universe, "algorithm.sector_universe")?;
        Ok(())
    }
}

fn validate_settings(settings: &AlgorithmSettings, field: &str) -> Result<(), ValidationError> {
    if settings.start_date >= settings.end_date {
        return Err(ValidationError::InvalidValue(format!(
            "{}: start_date {} 必須早於 end_date {}",
            field, settings.start_date, settings.end_date
        )));
    }
    ValidationUtils::finite(settings.cash, &format!("{}.cash", field))?;
    ValidationUtils::in_range(settings.cash, 1.0, 1e12, &format!("{}.cash", field))
}

impl Validator for MeanReversionConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 標準差至少需要兩個觀測值
        ValidationUtils::in_range(self.lookback, 2, 10_000, "mean_reversion.lookback")?;
        ValidationUtils::in_range(self.ema_span, 1, 10_000, "mean_reversion.ema_span")?;
        ValidationUtils::in_range(self.insight_period_days, 1, 365, "mean_reversion.insight_period_days")?;
        Ok(())
    }
}

impl Validator for LiquidUniverseConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::in_range(self.min_price, 0.0, 1e9, "liquid_universe.min_price")?;
        ValidationUtils::in_range(self.top_n, 1, 100_000, "liquid_universe.top_n")?;
        Ok(())
    }
}

impl Validator for SectorUniverseConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::not_empty(&self.market, "sector_universe.market")?;
        ValidationUtils::in_range(self.min_price, 0.0, self.max_price, "sector_universe.min_price")?;
        ValidationUtils::in_range(self.portfolio_size, 1, 10_000, "sector_universe.portfolio_size")?;

        if self.sectors.is_empty() {
            return Err(ValidationError::MissingField("sector_universe.sectors".to_string()));
        }

        Ok(())
    }
}
