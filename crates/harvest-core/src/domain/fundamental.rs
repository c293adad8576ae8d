//! 종목 펀더멘털 레코드.
//!
//! instruments 조회 응답을 그대로 반영하는 평평한 레코드입니다.
//! 모든 수치 필드는 선택적입니다. "해당 종목에 아직 제공되지 않는 값"은
//! 0과 구별되는 유효한 상태이며, 반올림을 포함한 모든 정규화는 값이
//! 있을 때만 수행됩니다.

use crate::types::decimal::round_opt;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// 전체 펀더멘털을 저장하는 최소 시가총액 (백만 달러 단위).
///
/// 이 값 미만이면 시가총액만 담은 축약 레코드를 저장하고 나머지 필드는
/// 건드리지 않습니다.
pub const MARKET_CAP_FLOOR_MILLIONS: Decimal = dec!(500);

/// instruments 응답의 펀더멘털 블록.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FundamentalSnapshot {
    pub symbol: Option<String>,
    /// 52주 최고가
    pub high52: Option<Decimal>,
    /// 52주 최저가
    pub low52: Option<Decimal>,
    pub dividend_amount: Option<Decimal>,
    pub dividend_yield: Option<Decimal>,
    pub dividend_date: Option<String>,
    pub pe_ratio: Option<Decimal>,
    pub peg_ratio: Option<Decimal>,
    pub pb_ratio: Option<Decimal>,
    pub pr_ratio: Option<Decimal>,
    pub pcf_ratio: Option<Decimal>,
    #[serde(rename = "grossMarginTTM")]
    pub gross_margin_ttm: Option<Decimal>,
    #[serde(rename = "grossMarginMRQ")]
    pub gross_margin_mrq: Option<Decimal>,
    #[serde(rename = "netProfitMarginTTM")]
    pub net_profit_margin_ttm: Option<Decimal>,
    #[serde(rename = "netProfitMarginMRQ")]
    pub net_profit_margin_mrq: Option<Decimal>,
    #[serde(rename = "operatingMarginTTM")]
    pub operating_margin_ttm: Option<Decimal>,
    #[serde(rename = "operatingMarginMRQ")]
    pub operating_margin_mrq: Option<Decimal>,
    pub return_on_equity: Option<Decimal>,
    pub return_on_assets: Option<Decimal>,
    pub return_on_investment: Option<Decimal>,
    pub quick_ratio: Option<Decimal>,
    pub current_ratio: Option<Decimal>,
    pub interest_coverage: Option<Decimal>,
    pub total_debt_to_capital: Option<Decimal>,
    pub lt_debt_to_equity: Option<Decimal>,
    pub total_debt_to_equity: Option<Decimal>,
    #[serde(rename = "epsTTM")]
    pub eps_ttm: Option<Decimal>,
    #[serde(rename = "epsChangePercentTTM")]
    pub eps_change_percent_ttm: Option<Decimal>,
    pub eps_change_year: Option<Decimal>,
    pub eps_change: Option<i64>,
    pub rev_change_year: Option<i64>,
    #[serde(rename = "revChangeTTM")]
    pub rev_change_ttm: Option<Decimal>,
    pub rev_change_in: Option<i64>,
    pub shares_outstanding: Option<Decimal>,
    pub market_cap_float: Option<Decimal>,
    /// 시가총액 (백만 달러 단위)
    pub market_cap: Option<Decimal>,
    pub book_value_per_share: Option<Decimal>,
    pub short_int_to_float: Option<i64>,
    pub short_int_day_to_cover: Option<i64>,
    pub div_growth_rate_3_year: Option<i64>,
    pub dividend_pay_amount: Option<Decimal>,
    pub dividend_pay_date: Option<String>,
    pub beta: Option<Decimal>,
    /// 1일 평균 거래량
    pub vol1_day_avg: Option<Decimal>,
    /// 10일 평균 거래량 (선별 질의 기준)
    pub vol10_day_avg: Option<Decimal>,
    /// 3개월 평균 거래량
    pub vol3_month_avg: Option<Decimal>,
}

impl FundamentalSnapshot {
    /// 저장 대상 금액/비율/마진 필드를 표시 정밀도로 반올림합니다.
    ///
    /// 값이 없는 필드는 건드리지 않습니다. 거래량 평균은 반올림 대상이
    /// 아닙니다.
    pub fn round_for_display(&mut self) {
        for field in [
            &mut self.high52,
            &mut self.low52,
            &mut self.dividend_amount,
            &mut self.dividend_yield,
            &mut self.pe_ratio,
            &mut self.peg_ratio,
            &mut self.pb_ratio,
            &mut self.pr_ratio,
            &mut self.pcf_ratio,
            &mut self.gross_margin_ttm,
            &mut self.gross_margin_mrq,
            &mut self.net_profit_margin_ttm,
            &mut self.net_profit_margin_mrq,
            &mut self.operating_margin_ttm,
            &mut self.operating_margin_mrq,
            &mut self.return_on_equity,
            &mut self.return_on_assets,
            &mut self.return_on_investment,
            &mut self.quick_ratio,
            &mut self.current_ratio,
            &mut self.interest_coverage,
            &mut self.total_debt_to_capital,
            &mut self.lt_debt_to_equity,
            &mut self.total_debt_to_equity,
            &mut self.eps_ttm,
            &mut self.eps_change_percent_ttm,
            &mut self.eps_change_year,
            &mut self.rev_change_ttm,
            &mut self.market_cap_float,
            &mut self.market_cap,
            &mut self.book_value_per_share,
            &mut self.dividend_pay_amount,
            &mut self.beta,
        ] {
            round_opt(field);
        }
    }
}

/// instruments 조회로 얻는 종목 프로필.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstrumentProfile {
    pub fundamental: FundamentalSnapshot,
    pub cusip: Option<String>,
    pub symbol: Option<String>,
    pub description: Option<String>,
    pub exchange: Option<String>,
    pub asset_type: Option<String>,
}
