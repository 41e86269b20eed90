//! 均值回歸 Alpha 模型
//!
//! 收盤價跌破 `EMA - σ` 視為做多訊號，突破 `EMA + σ` 視為做空訊號。
//! 訊號強度由最新一列的 z 分數推得：
//!
//! - 幅度：做多 `-z·σ/P`，做空 `z·σ/P`
//! - 信心：做多 `Φ(-z)`，做空 `Φ(z)`
//! - 權重：`信心 - 1/(幅度 + 1)`，僅保留正值並在同方向內正規化

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use super::traits::AlphaModel;
use crate::algorithm::AlgorithmContext;
use crate::data_provider::{DataProviderResult, HistoryProvider};
use crate::domain_types::indicators::{fill_nan, normal_cdf};
use crate::domain_types::{
    IndicatorsExt, Insight, InsightDirection, PriceHistory, Resolution, SecurityChanges, Symbol,
};

/// 均值回歸模型配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanReversionConfig {
    /// 歷史K線數量
    pub lookback: usize,
    pub resolution: Resolution,
    /// EMA 跨度
    pub ema_span: usize,
    /// 洞見有效天數
    pub insight_period_days: i64,
}

impl Default for MeanReversionConfig {
    fn default() -> Self {
        Self {
            lookback: 30,
            resolution: Resolution::Daily,
            ema_span: 30,
            insight_period_days: 1,
        }
    }
}

/// 單一代碼的訊號評分
#[derive(Debug, Clone, PartialEq)]
struct SignalScore {
    symbol: Symbol,
    magnitude: f64,
    confidence: f64,
    weight: f64,
}

/// 均值回歸 Alpha 模型
#[derive(Debug, Clone, Default)]
pub struct MeanReversionAlphaModel {
    config: MeanReversionConfig,
    securities: BTreeSet<Symbol>,
}

impl MeanReversionAlphaModel {
    pub const NAME: &'static str = "MeanReversionAlphaModel";

    pub fn new(config: MeanReversionConfig) -> Self {
        Self {
            config,
            securities: BTreeSet::new(),
        }
    }

    pub fn config(&self) -> &MeanReversionConfig {
        &self.config
    }

    /// 目前追蹤的代碼
    pub fn securities(&self) -> &BTreeSet<Symbol> {
        &self.securities
    }

    /// 由收盤價表計算洞見；做多在前、做空在後，各自依代碼排序
    pub fn generate_insights(&self, history: &PriceHistory, time: DateTime<Utc>) -> Vec<Insight> {
        if history.is_empty() {
            return Vec::new();
        }

        let closes = history.closes();
        let ema = history.ema(self.config.ema_span);
        let std = history.std();
        let zscore = history.zscore();
        let last = history.n_rows() - 1;

        let mut longs = Vec::new();
        let mut shorts = Vec::new();

        for (col, symbol) in history.symbols().iter().enumerate() {
            let price = closes[[last, col]];
            let mean = ema[[last, col]];
            let sigma = std[col];
            let z = zscore[[last, col]];

            // NaN 比較一律為 false
            if price <= mean - sigma {
                let magnitude = fill_nan(-z * sigma / price, 0.0);
                let confidence = fill_nan(normal_cdf(-z), 0.0);
                longs.push(score(symbol, magnitude, confidence));
            }
            if price >= mean + sigma {
                let magnitude = fill_nan(z * sigma / price, 0.0);
                let confidence = fill_nan(normal_cdf(z), 0.0);
                shorts.push(score(symbol, magnitude, confidence));
            }
        }

        debug!(
            "均值回歸候選: 做多 {} 檔, 做空 {} 檔",
            longs.len(),
            shorts.len()
        );

        let mut insights = self.emit(longs, InsightDirection::Up, time);
        insights.extend(self.emit(shorts, InsightDirection::Down, time));
        insights
    }

    /// 篩掉非正權重，正規化後輸出洞見
    fn emit(&self, scores: Vec<SignalScore>, direction: InsightDirection, time: DateTime<Utc>) -> Vec<Insight> {
        let positive: Vec<SignalScore> = scores.into_iter().filter(|s| s.weight > 0.0).collect();
        let total: f64 = positive.iter().map(|s| s.weight).sum();
        if total.is_nan() || total <= 0.0 {
            return Vec::new();
        }

        let period = Duration::days(self.config.insight_period_days);
        positive
            .into_iter()
            .map(|s| {
                Insight::price(
                    s.symbol,
                    period,
                    direction,
                    Some(s.magnitude),
                    Some(s.confidence),
                    Self::NAME,
                    Some(s.weight / total),
                    time,
                )
            })
            .collect()
    }
}

fn score(symbol: &Symbol, magnitude: f64, confidence: f64) -> SignalScore {
    SignalScore {
        symbol: symbol.clone(),
        magnitude,
        confidence,
        weight: confidence - 1.0 / (magnitude + 1.0),
    }
}

impl AlphaModel for MeanReversionAlphaModel {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn update(
        &mut self,
        ctx: &AlgorithmContext,
        history: &dyn HistoryProvider,
    ) -> DataProviderResult<Vec<Insight>> {
        let symbols: Vec<Symbol> = self.securities.iter().cloned().collect();
        if symbols.is_empty() {
            return Ok(Vec::new());
        }

        let prices = history.history(&symbols, self.config.lookback, self.config.resolution, ctx.time)?;
        if prices.is_empty() {
            debug!("歷史數據為空，略過本次更新");
            return Ok(Vec::new());
        }

        Ok(self.generate_insights(&prices, ctx.time))
    }

    fn on_securities_changed(&mut self, _ctx: &AlgorithmContext, changes: &SecurityChanges) {
        for security in &changes.removed {
            self.securities.remove(&security.symbol);
        }
        for security in &changes.added {
            self.securities.insert(security.symbol.clone());
        }
    }
}
