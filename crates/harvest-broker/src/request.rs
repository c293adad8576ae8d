//! 작업 종류별 요청 구성.
//!
//! 작업 항목으로부터 엔드포인트, 질의 파라미터, 시간 창을 만듭니다.
//! 가격 히스토리의 시간 창은 미 동부 기준 다음 거래일 경계에서
//! 끝나며, 날짜 파라미터는 Unix epoch 밀리초 문자열로 전달됩니다.

use chrono::{DateTime, Duration, LocalResult, NaiveTime, TimeZone, Utc};
use chrono_tz::America::New_York;
use harvest_core::{WorkItem, WorkKind};

/// 브로커 REST API 기본 URL.
pub const DEFAULT_BASE_URL: &str = "https://api.tdameritrade.com/v1";

/// 브로커 엔드포인트 집합.
#[derive(Debug, Clone)]
pub struct BrokerEndpoints {
    base_url: String,
}

impl BrokerEndpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 작업 항목이 호출할 URL.
    pub fn url_for(&self, item: &WorkItem) -> String {
        match item.kind {
            WorkKind::Macros => format!("{}/instruments", self.base_url),
            WorkKind::Medium | WorkKind::Short | WorkKind::Signals => {
                format!("{}/marketdata/{}/pricehistory", self.base_url, item.symbol)
            }
        }
    }
}

impl Default for BrokerEndpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// 가격 히스토리 질의 파라미터.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PriceHistoryQuery {
    period_type: &'static str,
    frequency_type: &'static str,
    frequency: &'static str,
    /// Unix epoch 밀리초
    start_date: String,
    /// Unix epoch 밀리초
    end_date: String,
    need_extended_hours_data: &'static str,
}

impl PriceHistoryQuery {
    fn minute_bars(frequency: &'static str, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            period_type: "day",
            frequency_type: "minute",
            frequency,
            start_date: epoch_millis(start),
            end_date: epoch_millis(end),
            need_extended_hours_data: "true",
        }
    }

    fn push_onto(self, query: &mut Vec<(&'static str, String)>) {
        query.push(("periodType", self.period_type.to_string()));
        query.push(("frequencyType", self.frequency_type.to_string()));
        query.push(("frequency", self.frequency.to_string()));
        query.push(("startDate", self.start_date));
        query.push(("endDate", self.end_date));
        query.push((
            "needExtendedHoursData",
            self.need_extended_hours_data.to_string(),
        ));
    }
}

/// 작업 종류에 맞는 질의 파라미터를 구성합니다.
///
/// 모든 요청은 `apikey` 파라미터를 포함합니다. bearer 토큰은 헤더로
/// 전달되며 여기서는 다루지 않습니다.
pub fn build_query(item: &WorkItem, api_key: &str, now: DateTime<Utc>) -> Vec<(&'static str, String)> {
    let mut query = vec![("apikey", api_key.to_string())];

    match item.kind {
        WorkKind::Macros => {
            query.push(("projection", "fundamental".to_string()));
            query.push(("symbol", item.symbol.clone()));
        }
        WorkKind::Medium => {
            let end = next_day_boundary(now);
            let start = end - Duration::days(15);
            PriceHistoryQuery::minute_bars("30", start, end).push_onto(&mut query);
        }
        WorkKind::Short | WorkKind::Signals => {
            let end = next_day_boundary(now);
            let start = end - Duration::hours(14);
            PriceHistoryQuery::minute_bars("15", start, end).push_onto(&mut query);
        }
    }

    query
}

/// 다음 거래일 경계(미 동부 자정)를 반환합니다.
pub fn next_day_boundary(now: DateTime<Utc>) -> DateTime<Utc> {
    let eastern = now.with_timezone(&New_York);
    let next_midnight = (eastern.date_naive() + Duration::days(1)).and_time(NaiveTime::MIN);

    match New_York.from_local_datetime(&next_midnight) {
        LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => t.with_timezone(&Utc),
        // DST 전환으로 없는 시각이면 한 시간 뒤를 사용
        LocalResult::None => New_York
            .from_local_datetime(&(next_midnight + Duration::hours(1)))
            .earliest()
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&next_midnight)),
    }
}

/// 브로커 API 날짜 형식 (epoch 밀리초 문자열).
fn epoch_millis(t: DateTime<Utc>) -> String {
    t.timestamp_millis().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_core::WorkItem;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn query_value<'a>(query: &'a [(&'static str, String)], key: &str) -> &'a str {
        query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .unwrap()
    }

    #[test]
    fn test_url_for_kind() {
        let endpoints = BrokerEndpoints::new("https://broker.example/v1/");
        assert_eq!(
            endpoints.url_for(&WorkItem::new(WorkKind::Macros, "AAPL")),
            "https://broker.example/v1/instruments"
        );
        assert_eq!(
            endpoints.url_for(&WorkItem::new(WorkKind::Short, "AAPL")),
            "https://broker.example/v1/marketdata/AAPL/pricehistory"
        );
    }

    #[test]
    fn test_next_day_boundary_standard_time() {
        // 2024-01-10 15:00 UTC = 동부 10:00 → 경계는 1월 11일 00:00 EST (05:00 UTC)
        let boundary = next_day_boundary(utc(2024, 1, 10, 15, 0));
        assert_eq!(boundary, utc(2024, 1, 11, 5, 0));

        // 동부 자정 직전 (UTC로는 이미 다음 날)
        let boundary = next_day_boundary(utc(2024, 1, 11, 3, 0));
        assert_eq!(boundary, utc(2024, 1, 11, 5, 0));

        // 동부 자정 직후에는 경계가 하루 뒤로 넘어간다
        let boundary = next_day_boundary(utc(2024, 1, 11, 6, 0));
        assert_eq!(boundary, utc(2024, 1, 12, 5, 0));
    }

    #[test]
    fn test_next_day_boundary_daylight_saving() {
        // 여름에는 EDT (UTC-4)
        let boundary = next_day_boundary(utc(2024, 7, 3, 12, 0));
        assert_eq!(boundary, utc(2024, 7, 4, 4, 0));
    }

    #[test]
    fn test_macros_query_shape() {
        let item = WorkItem::new(WorkKind::Macros, "NVDA");
        let query = build_query(&item, "demo-key", utc(2024, 1, 10, 15, 0));

        assert_eq!(query_value(&query, "apikey"), "demo-key");
        assert_eq!(query_value(&query, "projection"), "fundamental");
        assert_eq!(query_value(&query, "symbol"), "NVDA");
        assert!(query.iter().all(|(k, _)| *k != "periodType"));
    }

    #[test]
    fn test_medium_query_window() {
        let now = utc(2024, 1, 10, 15, 0);
        let item = WorkItem::new(WorkKind::Medium, "AAPL");
        let query = build_query(&item, "demo-key", now);

        let end = utc(2024, 1, 11, 5, 0);
        let start = end - Duration::days(15);

        assert_eq!(query_value(&query, "periodType"), "day");
        assert_eq!(query_value(&query, "frequencyType"), "minute");
        assert_eq!(query_value(&query, "frequency"), "30");
        assert_eq!(query_value(&query, "needExtendedHoursData"), "true");
        assert_eq!(
            query_value(&query, "endDate"),
            end.timestamp_millis().to_string()
        );
        assert_eq!(
            query_value(&query, "startDate"),
            start.timestamp_millis().to_string()
        );
    }

    #[test]
    fn test_short_and_signals_share_query_shape() {
        let now = utc(2024, 1, 10, 15, 0);
        let end = utc(2024, 1, 11, 5, 0);
        let start = end - Duration::hours(14);

        for kind in [WorkKind::Short, WorkKind::Signals] {
            let query = build_query(&WorkItem::new(kind, "AAPL"), "demo-key", now);
            assert_eq!(query_value(&query, "frequency"), "15");
            assert_eq!(
                query_value(&query, "startDate"),
                start.timestamp_millis().to_string()
            );
            assert_eq!(
                query_value(&query, "endDate"),
                end.timestamp_millis().to_string()
            );
        }
    }
}
