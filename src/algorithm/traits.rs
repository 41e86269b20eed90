use serde::{Deserialize, Serialize};

use super::context::{AlgorithmContext, LiquidationRequest, Slice};
use super::settings::AlgorithmSettings;
use super::AlgorithmResult;
use crate::data_provider::HistoryProvider;
use crate::domain_types::{Fundamental, Insight, SecurityChanges};
use crate::portfolio::PortfolioTarget;
use crate::universe::UniverseSelection;

/// 數據回呼的產出
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepOutput {
    pub insights: Vec<Insight>,
    pub targets: Vec<PortfolioTarget>,
}

/// 演算法回呼介面
pub trait Algorithm: Send {
    fn name(&self) -> &str;

    fn settings(&self) -> &AlgorithmSettings;

    /// 啟動時呼叫一次
    fn initialize(&mut self) -> AlgorithmResult<()>;

    /// 宇宙選擇回呼
    fn select(&mut self, ctx: &AlgorithmContext, fundamentals: &[Fundamental]) -> UniverseSelection;

    /// 宇宙變動回呼，回傳需要平倉的代碼
    fn on_securities_changed(
        &mut self,
        ctx: &AlgorithmContext,
        changes: &SecurityChanges,
    ) -> Vec<LiquidationRequest>;

    /// 數據到達回呼
    fn on_data(
        &mut self,
        ctx: &AlgorithmContext,
        slice: &Slice,
        history: &dyn HistoryProvider,
    ) -> AlgorithmResult<StepOutput>;
}
