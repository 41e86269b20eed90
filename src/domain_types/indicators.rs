//! 基本統計指標實現

use ndarray::{Array1, Array2};
use statrs::distribution::{ContinuousCDF, Normal};
use statrs::statistics::Statistics;

use super::price_history::PriceHistory;

/// 調整式指數移動平均（adjust = true）
///
/// 權重為 `(1-α)^k`，`α = 2 / (span + 1)`。NaN 觀測值不計入，但仍使較舊的權重衰減；
/// 首個有效值之前輸出 NaN，之後遇到 NaN 則沿用前一個平均值。
pub fn ema_adjusted(values: &[f64], span: usize) -> Vec<f64> {
    let mut output = vec![f64::NAN; values.len()];
    if values.is_empty() || span == 0 {
        return output;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;

    let mut weighted = f64::NAN;
    let mut old_weight = 1.0;

    for (i, &value) in values.iter().enumerate() {
        let is_observation = !value.is_nan();

        if weighted.is_nan() {
            if is_observation {
                weighted = value;
                old_weight = 1.0;
            }
        } else {
            old_weight *= decay;
            if is_observation {
                if weighted != value {
                    weighted = (old_weight * weighted + value) / (old_weight + 1.0);
                }
                old_weight += 1.0;
            }
        }

        output[i] = weighted;
    }

    output
}

/// 樣本標準差（ddof = 1），忽略 NaN；有效值少於兩個時回傳 NaN
pub fn sample_std(values: &[f64]) -> f64 {
    let clean: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if clean.len() < 2 {
        return f64::NAN;
    }
    clean.iter().std_dev()
}

/// 母體 z 分數（ddof = 0）
///
/// 任一值為 NaN 時整段輸出 NaN。常數序列輸出全零。
pub fn zscore(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    if values.iter().any(|v| v.is_nan()) {
        return vec![f64::NAN; values.len()];
    }

    let first = values[0];
    if values.iter().all(|v| *v == first) {
        return vec![0.0; values.len()];
    }

    let mean = values.iter().mean();
    let std = values.iter().population_std_dev();
    if std == 0.0 {
        return vec![0.0; values.len()];
    }

    values.iter().map(|v| (v - mean) / std).collect()
}

/// 標準常態分佈累積機率
pub fn normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    Normal::new(0.0, 1.0)
        .map(|dist| dist.cdf(x))
        .unwrap_or(f64::NAN)
}

/// NaN 以零取代
pub fn fill_nan(value: f64, fill: f64) -> f64 {
    if value.is_nan() {
        fill
    } else {
        value
    }
}

/// 為收盤價矩陣添加逐欄統計功能的擴展 trait
pub trait IndicatorsExt {
    /// 逐欄指數移動平均
    fn ema(&self, span: usize) -> Array2<f64>;

    /// 逐欄樣本標準差，順序與代碼一致
    fn std(&self) -> Vec<f64>;

    /// 逐欄 z 分數
    fn zscore(&self) -> Array2<f64>;
}

impl IndicatorsExt for PriceHistory {
    fn ema(&self, span: usize) -> Array2<f64> {
        map_columns(self, |column| ema_adjusted(column, span))
    }

    fn std(&self) -> Vec<f64> {
        self.closes()
            .columns()
            .into_iter()
            .map(|column| sample_std(&column.to_vec()))
            .collect()
    }

    fn zscore(&self) -> Array2<f64> {
        map_columns(self, zscore)
    }
}

fn map_columns<F>(history: &PriceHistory, transform: F) -> Array2<f64>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let closes = history.closes();
    let mut output = Array2::from_elem(closes.raw_dim(), f64::NAN);

    for (idx, column) in closes.columns().into_iter().enumerate() {
        let transformed = Array1::from(transform(&column.to_vec()));
        output.column_mut(idx).assign(&transformed);
    }

    output
}
