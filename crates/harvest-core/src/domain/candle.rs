//! 가격 히스토리(캔들) 레코드.
//!
//! 가격 히스토리 응답을 종목당 하나의 문서로 정규화합니다. 파생 지표
//! 계산은 별도의 집계 루틴 소관이며, 여기서는 정렬 정규화만 수행합니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// OHLCV 캔들 하나.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    /// 캔들 시작 시각 (Unix epoch 밀리초)
    pub datetime: i64,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
    /// 거래량
    pub volume: i64,
}

/// 브로커 가격 히스토리 응답 페이로드.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PriceHistoryPayload {
    pub symbol: Option<String>,
    pub candles: Vec<Candle>,
    /// 조회 구간에 데이터가 없으면 true (휴장일 등)
    pub empty: bool,
}

/// 종목당 하나씩 저장되는 캔들 히스토리 문서.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleHistory {
    pub symbol: String,
    pub candles: Vec<Candle>,
}

impl CandleHistory {
    /// 페이로드 캔들을 시각 오름차순으로 정렬하여 히스토리를 만듭니다.
    pub fn from_payload(symbol: impl Into<String>, mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.datetime);
        Self {
            symbol: symbol.into(),
            candles,
        }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }
}
