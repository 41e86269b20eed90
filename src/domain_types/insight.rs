//! 交易洞見（方向性價格預測）

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::Symbol;

/// 洞見方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsightDirection {
    Up,
    Down,
    Flat,
}

impl InsightDirection {
    /// 方向符號：Up = 1, Down = -1, Flat = 0
    pub fn sign(self) -> f64 {
        match self {
            InsightDirection::Up => 1.0,
            InsightDirection::Down => -1.0,
            InsightDirection::Flat => 0.0,
        }
    }
}

impl fmt::Display for InsightDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsightDirection::Up => write!(f, "Up"),
            InsightDirection::Down => write!(f, "Down"),
            InsightDirection::Flat => write!(f, "Flat"),
        }
    }
}

/// 方向性價格預測
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub symbol: Symbol,
    pub direction: InsightDirection,
    #[serde(with = "duration_seconds")]
    pub period: Duration,
    pub magnitude: Option<f64>,
    pub confidence: Option<f64>,
    pub weight: Option<f64>,
    pub source_model: String,
    pub generated_time: DateTime<Utc>,
    pub close_time: DateTime<Utc>,
}

impl Insight {
    /// 建立價格洞見，到期時間為生成時間加上持續期間
    #[allow(clippy::too_many_arguments)]
    pub fn price(
        symbol: Symbol,
        period: Duration,
        direction: InsightDirection,
        magnitude: Option<f64>,
        confidence: Option<f64>,
        source_model: impl Into<String>,
        weight: Option<f64>,
        generated_time: DateTime<Utc>,
    ) -> Self {
        Self {
            symbol,
            direction,
            period,
            magnitude,
            confidence,
            weight,
            source_model: source_model.into(),
            generated_time,
            close_time: generated_time + period,
        }
    }

    /// 在指定時間是否仍然有效
    pub fn is_active(&self, time: DateTime<Utc>) -> bool {
        time >= self.generated_time && time < self.close_time
    }
}

/// 以秒為單位序列化 chrono::Duration
mod duration_seconds {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(duration.num_seconds())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = i64::deserialize(deserializer)?;
        Ok(Duration::seconds(seconds))
    }
}
