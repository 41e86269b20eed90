use chrono::NaiveDate;
use tracing::{debug, info};

use super::context::{AlgorithmContext, LiquidationRequest, Slice};
use super::settings::AlgorithmSettings;
use super::traits::{Algorithm, StepOutput};
use super::{AlgorithmError, AlgorithmResult};
use crate::alpha::{AlphaModel, MeanReversionAlphaModel, MeanReversionConfig};
use crate::data_provider::HistoryProvider;
use crate::domain_types::{Fundamental, Resolution, SecurityChanges};
use crate::portfolio::{EqualWeightingPortfolioConstructionModel, PortfolioConstructionModel};
use crate::universe::{
    LiquidUniverseConfig, LiquidUniverseSelectionModel, UniverseSelection, UniverseSelectionModel,
};

/// 均值回歸策略：流動性宇宙 + 均值回歸 Alpha + 等權重建構
#[derive(Debug, Clone)]
pub struct MeanReversionAlgorithm {
    settings: AlgorithmSettings,
    universe: LiquidUniverseSelectionModel,
    alpha: MeanReversionAlphaModel,
    portfolio: EqualWeightingPortfolioConstructionModel,
    initialized: bool,
}

impl Default for MeanReversionAlgorithm {
    fn default() -> Self {
        Self::new(
            Self::default_settings(),
            LiquidUniverseConfig::default(),
            MeanReversionConfig::default(),
        )
    }
}

impl MeanReversionAlgorithm {
    pub fn new(
        settings: AlgorithmSettings,
        universe: LiquidUniverseConfig,
        alpha: MeanReversionConfig,
    ) -> Self {
        Self {
            settings,
            universe: LiquidUniverseSelectionModel::new(universe),
            alpha: MeanReversionAlphaModel::new(alpha),
            portfolio: EqualWeightingPortfolioConstructionModel::new(),
            initialized: false,
        }
    }

    /// 2020-01-01 至 2021-01-01，初始資金 100,000，日線
    pub fn default_settings() -> AlgorithmSettings {
        AlgorithmSettings::new(
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap_or_default(),
            100_000.0,
            Resolution::Daily,
        )
    }

    pub fn alpha(&self) -> &MeanReversionAlphaModel {
        &self.alpha
    }
}

impl Algorithm for MeanReversionAlgorithm {
    fn name(&self) -> &str {
        "MeanReversionAlgorithm"
    }

    fn settings(&self) -> &AlgorithmSettings {
        &self.settings
    }

    fn initialize(&mut self) -> AlgorithmResult<()> {
        self.settings.validate()?;
        self.initialized = true;
        info!(
            "{} 初始化完成: {} ~ {}, 資金 {:.2}, 解析度 {}",
            self.name(),
            self.settings.start_date,
            self.settings.end_date,
            self.settings.cash,
            self.settings.resolution
        );
        Ok(())
    }

    fn select(&mut self, ctx: &AlgorithmContext, fundamentals: &[Fundamental]) -> UniverseSelection {
        self.universe.select(ctx, fundamentals)
    }

    fn on_securities_changed(
        &mut self,
        ctx: &AlgorithmContext,
        changes: &SecurityChanges,
    ) -> Vec<LiquidationRequest> {
        info!(
            "{} 宇宙變動: 新增 {} 檔, 移除 {} 檔",
            ctx.time,
            changes.added.len(),
            changes.removed.len()
        );
        self.alpha.on_securities_changed(ctx, changes);
        self.portfolio.on_securities_changed(changes);
        // 移除的部位由投資組合輸出 0% 目標處理
        Vec::new()
    }

    fn on_data(
        &mut self,
        ctx: &AlgorithmContext,
        slice: &Slice,
        history: &dyn HistoryProvider,
    ) -> AlgorithmResult<StepOutput> {
        if !self.initialized {
            return Err(AlgorithmError::NotInitialized);
        }
        if !slice.has_bars() {
            return Ok(StepOutput::default());
        }

        let insights = self.alpha.update(ctx, history)?;
        let targets = self.portfolio.create_targets(ctx.time, &insights);
        debug!("產生 {} 個洞見, {} 個目標", insights.len(), targets.len());

        Ok(StepOutput { insights, targets })
    }
}
