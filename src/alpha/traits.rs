use crate::algorithm::AlgorithmContext;
use crate::data_provider::{DataProviderResult, HistoryProvider};
use crate::domain_types::{Insight, SecurityChanges};

/// Alpha 模型特性
pub trait AlphaModel: Send {
    fn name(&self) -> &str;

    /// 依最新歷史數據產生洞見
    fn update(
        &mut self,
        ctx: &AlgorithmContext,
        history: &dyn HistoryProvider,
    ) -> DataProviderResult<Vec<Insight>>;

    /// 宇宙變動時更新追蹤的代碼
    fn on_securities_changed(&mut self, ctx: &AlgorithmContext, changes: &SecurityChanges);
}
