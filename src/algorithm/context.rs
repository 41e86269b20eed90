use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain_types::{Bar, Symbol};

/// 回呼時的演算法上下文：當前時間與唯讀持倉視圖
#[derive(Debug, Clone)]
pub struct AlgorithmContext {
    pub time: DateTime<Utc>,
    holdings: HashSet<Symbol>,
}

impl AlgorithmContext {
    pub fn new(time: DateTime<Utc>) -> Self {
        Self {
            time,
            holdings: HashSet::new(),
        }
    }

    /// 設定目前持有部位的代碼
    pub fn with_holdings<I>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = Symbol>,
    {
        self.holdings = symbols.into_iter().collect();
        self
    }

    pub fn is_invested(&self, symbol: &Symbol) -> bool {
        self.holdings.contains(symbol)
    }
}

/// 單一時間點的數據切片
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub time: Option<DateTime<Utc>>,
    pub bars: Vec<Bar>,
}

impl Slice {
    pub fn new(time: DateTime<Utc>, bars: Vec<Bar>) -> Self {
        Self {
            time: Some(time),
            bars,
        }
    }

    pub fn has_bars(&self) -> bool {
        !self.bars.is_empty()
    }
}

/// 要求宿主平台平倉的指令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidationRequest {
    pub symbol: Symbol,
    pub tag: String,
}

impl LiquidationRequest {
    pub fn new(symbol: Symbol) -> Self {
        let tag = format!("投組清倉: {}", symbol);
        Self { symbol, tag }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_holdings_lookup() {
        let ctx = AlgorithmContext::new(Utc::now()).with_holdings(vec![Symbol::from("AAPL")]);
        assert!(ctx.is_invested(&Symbol::from("AAPL")));
        assert!(!ctx.is_invested(&Symbol::from("MSFT")));
    }

    #[test]
    fn test_slice_has_bars() {
        let time = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let slice = Slice::new(time, vec![Bar::new(time, "SPY", 470.0)]);

        assert!(slice.has_bars());
        assert_eq!(slice.time, Some(time));
        assert!(!Slice::default().has_bars());
    }

    #[test]
    fn test_liquidation_tag() {
        let request = LiquidationRequest::new(Symbol::from("TSLA"));
        assert_eq!(request.tag, "投組清倉: TSLA");
    }
}
