use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{debug, info};

use super::context::{AlgorithmContext, LiquidationRequest, Slice};
use super::settings::AlgorithmSettings;
use super::traits::{Algorithm, StepOutput};
use super::{AlgorithmError, AlgorithmResult};
use crate::data_provider::HistoryProvider;
use crate::domain_types::{Fundamental, Resolution, SecurityChanges, Symbol};
use crate::universe::{
    SectorUniverseConfig, SectorUniverseSelectionModel, UniverseSelection, UniverseSelectionModel,
};

/// 板塊均衡宇宙策略
///
/// 每日重選宇宙；被移出且仍有持倉的代碼要求平倉。
#[derive(Debug, Clone)]
pub struct SectorUniverseAlgorithm {
    settings: AlgorithmSettings,
    universe: SectorUniverseSelectionModel,
    active: BTreeSet<Symbol>,
    initialized: bool,
}

impl Default for SectorUniverseAlgorithm {
    fn default() -> Self {
        Self::new(Self::default_settings(), SectorUniverseConfig::default())
    }
}

impl SectorUniverseAlgorithm {
    pub fn new(settings: AlgorithmSettings, universe: SectorUniverseConfig) -> Self {
        Self {
            settings,
            universe: SectorUniverseSelectionModel::new(universe),
            active: BTreeSet::new(),
            initialized: false,
        }
    }

    /// 2024-01-01 至 2024-01-10，初始資金 100,000，日線
    pub fn default_settings() -> AlgorithmSettings {
        AlgorithmSettings::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap_or_default(),
            100_000.0,
            Resolution::Daily,
        )
    }

    /// 目前宇宙內的代碼
    pub fn active_securities(&self) -> &BTreeSet<Symbol> {
        &self.active
    }
}

impl Algorithm for SectorUniverseAlgorithm {
    fn name(&self) -> &str {
        "SectorUniverseAlgorithm"
    }

    fn settings(&self) -> &AlgorithmSettings {
        &self.settings
    }

    fn initialize(&mut self) -> AlgorithmResult<()> {
        self.settings.validate()?;
        self.initialized = true;
        info!(
            "{} 初始化完成: {} ~ {}, 每板塊 {} 檔",
            self.name(),
            self.settings.start_date,
            self.settings.end_date,
            self.universe.config().portfolio_size
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
        for security in &changes.added {
            info!("{} universe added  : {} {:.2}", ctx.time, security.symbol, security.price);
            self.active.insert(security.symbol.clone());
        }

        let mut liquidations = Vec::new();
        for security in &changes.removed {
            info!("{} universe removed: {}", ctx.time, security.symbol);
            self.active.remove(&security.symbol);

            if security.invested || ctx.is_invested(&security.symbol) {
                liquidations.push(LiquidationRequest::new(security.symbol.clone()));
            }
        }

        info!("{} active securities: {}", ctx.time, self.active.len());
        liquidations
    }

    fn on_data(
        &mut self,
        _ctx: &AlgorithmContext,
        slice: &Slice,
        _history: &dyn HistoryProvider,
    ) -> AlgorithmResult<StepOutput> {
        if !self.initialized {
            return Err(AlgorithmError::NotInitialized);
        }
        if !slice.has_bars() {
            return Ok(StepOutput::default());
        }
        debug!("收到 {} 根K線", slice.bars.len());
        Ok(StepOutput::default())
    }
}
