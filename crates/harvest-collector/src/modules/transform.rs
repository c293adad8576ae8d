//! 변환·적재 단계.
//!
//! 성공한 API 호출 결과를 작업 종류에 맞는 도메인 레코드로 디코딩하고
//! 정규화(반올림, 조기 종료)한 뒤 upsert합니다. 저장이 끝난 뒤에만
//! 원래 작업 항목을 큐에서 제거하므로, 저장 실패 시 항목이 남아 다음
//! 실행에서 전체 fetch-and-load가 재시도됩니다. upsert가 멱등이라
//! 재처리로 중복이 생기지는 않습니다.

use super::EtlStores;
use harvest_core::{
    round_opt, ApiCallResult, CandleHistory, HarvestError, HarvestResult, InstrumentProfile,
    PriceHistoryPayload, WorkItem, WorkKind, MARKET_CAP_FLOOR_MILLIONS,
};
use serde_json::{Map, Value};
use tracing::{debug, info};

/// 변환·적재 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformOutcome {
    /// 펀더멘털 전체 저장
    Fundamentals,
    /// 시가총액 미달로 시가총액만 저장
    PartialFundamentals,
    /// 캔들 히스토리 저장 (저장된 캔들 수)
    Candles(usize),
}

/// API 호출 결과를 디코딩·정규화하여 저장하고, 성공 시 작업 항목을
/// 큐에서 제거합니다.
pub async fn transform_and_load(
    stores: &EtlStores,
    result: ApiCallResult,
) -> HarvestResult<TransformOutcome> {
    let ApiCallResult { body, item } = result;

    let outcome = match item.kind {
        WorkKind::Macros => load_fundamentals(stores, &item, &body).await?,
        WorkKind::Medium | WorkKind::Short | WorkKind::Signals => {
            load_candles(stores, &item, body).await?
        }
    };

    // 저장이 끝난 뒤에만 큐에서 제거한다. 제거가 실패해도 저장된
    // 레코드는 유지되며, 다음 실행의 upsert는 no-op이다.
    stores.queue.remove(&item).await?;

    info!(symbol = %item.symbol, work = %item.kind, "변환·적재 완료");
    Ok(outcome)
}

/// Macros: instruments 응답에서 요청 심볼의 프로필을 꺼내 저장합니다.
async fn load_fundamentals(
    stores: &EtlStores,
    item: &WorkItem,
    body: &Map<String, Value>,
) -> HarvestResult<TransformOutcome> {
    let raw = body.get(&item.symbol).ok_or_else(|| {
        HarvestError::Decode(format!("응답에 요청 심볼이 없음: {}", item.symbol))
    })?;
    let mut profile: InstrumentProfile = serde_json::from_value(raw.clone())?;

    // 조기 종료 판정 기준이므로 시가총액을 먼저 반올림한다
    round_opt(&mut profile.fundamental.market_cap);

    if let Some(cap) = profile.fundamental.market_cap {
        if cap < MARKET_CAP_FLOOR_MILLIONS {
            stores.fundamentals.upsert_market_cap(&item.symbol, cap).await?;
            debug!(symbol = %item.symbol, market_cap = %cap, "시가총액 미달, 축약 레코드 저장");
            return Ok(TransformOutcome::PartialFundamentals);
        }
    }

    profile.fundamental.round_for_display();
    stores
        .fundamentals
        .upsert_profile(&item.symbol, &profile)
        .await?;
    Ok(TransformOutcome::Fundamentals)
}

/// Medium/Short/Signals: 가격 히스토리 응답을 캔들 문서로 정규화하여
/// 작업 종류에 해당하는 컬렉션에 저장합니다.
async fn load_candles(
    stores: &EtlStores,
    item: &WorkItem,
    body: Map<String, Value>,
) -> HarvestResult<TransformOutcome> {
    let payload: PriceHistoryPayload = serde_json::from_value(Value::Object(body))?;

    let symbol = match payload.symbol {
        Some(s) if s != item.symbol => {
            return Err(HarvestError::Decode(format!(
                "응답 심볼 불일치: 요청 {}, 응답 {}",
                item.symbol, s
            )));
        }
        Some(s) => s,
        None => item.symbol.clone(),
    };

    let history = CandleHistory::from_payload(symbol, payload.candles);
    if history.is_empty() {
        debug!(symbol = %item.symbol, work = %item.kind, "조회 구간에 캔들 없음");
    }

    stores.candles.upsert_history(item.kind, &history).await?;
    Ok(TransformOutcome::Candles(history.len()))
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{memory_stores, preload_queue};
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn call_result(kind: WorkKind, symbol: &str, body: Value) -> ApiCallResult {
        let Value::Object(map) = body else {
            panic!("test body must be a JSON object");
        };
        ApiCallResult::new(map, WorkItem::new(kind, symbol))
    }

    fn candle_body(symbol: &str) -> Value {
        json!({
            "symbol": symbol,
            "candles": [
                {"datetime": 1_700_000_900_000i64, "open": 191.0, "high": 191.4,
                 "low": 190.6, "close": 191.2, "volume": 900_000},
                {"datetime": 1_700_000_000_000i64, "open": 190.1, "high": 191.0,
                 "low": 189.9, "close": 190.5, "volume": 1_200_000}
            ],
            "empty": false
        })
    }

    #[tokio::test]
    async fn test_macros_rounds_and_stores_full_record() {
        let (fundamentals, _candles, queue, stores) = memory_stores();
        preload_queue(&queue, WorkKind::Macros, &["AAPL"]);

        let body = json!({
            "AAPL": {
                "fundamental": {
                    "symbol": "AAPL",
                    "marketCap": 2_850_000.456,
                    "peRatio": 29.456,
                    "high52": 199.618,
                    "vol10DayAvg": 52_000_000.0
                },
                "cusip": "037833100",
                "assetType": "EQUITY"
            }
        });

        let outcome =
            transform_and_load(&stores, call_result(WorkKind::Macros, "AAPL", body))
                .await
                .unwrap();

        assert_eq!(outcome, TransformOutcome::Fundamentals);

        let profiles = fundamentals.profiles.lock().unwrap();
        let stored: InstrumentProfile =
            serde_json::from_value(profiles.get("AAPL").unwrap().clone()).unwrap();
        assert_eq!(stored.fundamental.market_cap, Some(dec!(2850000.46)));
        assert_eq!(stored.fundamental.pe_ratio, Some(dec!(29.46)));
        assert_eq!(stored.fundamental.high52, Some(dec!(199.62)));
        // 없는 필드는 그대로 None으로 저장된다
        assert_eq!(stored.fundamental.beta, None);

        // 저장 성공 후 큐에서 제거된다
        assert!(queue.items.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_macros_early_exit_below_market_cap_floor() {
        let (fundamentals, _candles, queue, stores) = memory_stores();
        preload_queue(&queue, WorkKind::Macros, &["TINY"]);

        // 시가총액 외의 필드가 전부 빠진 페이로드도 조기 종료 경로에서는
        // 아무 필드도 역참조하지 않는다
        let body = json!({
            "TINY": { "fundamental": { "marketCap": 400.456 } }
        });

        let outcome =
            transform_and_load(&stores, call_result(WorkKind::Macros, "TINY", body))
                .await
                .unwrap();

        assert_eq!(outcome, TransformOutcome::PartialFundamentals);
        assert_eq!(
            fundamentals.partials.lock().unwrap().get("TINY"),
            Some(&dec!(400.46))
        );
        // 전체 레코드는 저장되지 않는다
        assert!(fundamentals.profiles.lock().unwrap().is_empty());
        assert!(queue.items.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_macros_missing_symbol_key_is_decode_error() {
        let (fundamentals, _candles, queue, stores) = memory_stores();
        preload_queue(&queue, WorkKind::Macros, &["AAPL"]);

        let err = transform_and_load(
            &stores,
            call_result(WorkKind::Macros, "AAPL", json!({ "MSFT": {} })),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, HarvestError::Decode(_)));
        assert!(fundamentals.profiles.lock().unwrap().is_empty());
        // 디코딩 실패 시 항목은 큐에 남는다
        assert_eq!(queue.items.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_candles_sorted_stored_and_dequeued() {
        let (_fundamentals, candles, queue, stores) = memory_stores();
        preload_queue(&queue, WorkKind::Short, &["AAPL"]);

        let outcome = transform_and_load(
            &stores,
            call_result(WorkKind::Short, "AAPL", candle_body("AAPL")),
        )
        .await
        .unwrap();

        assert_eq!(outcome, TransformOutcome::Candles(2));

        let rows = candles.rows.lock().unwrap();
        let stored = rows.get(&(WorkKind::Short, "AAPL".to_string())).unwrap();
        // 시각 오름차순으로 정규화된다
        assert_eq!(stored[0].datetime, 1_700_000_000_000);
        assert_eq!(stored[1].datetime, 1_700_000_900_000);

        assert!(queue.items.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_candle_symbol_must_match_work_item() {
        let (_fundamentals, candles, queue, stores) = memory_stores();
        preload_queue(&queue, WorkKind::Signals, &["AAPL"]);

        let err = transform_and_load(
            &stores,
            call_result(WorkKind::Signals, "AAPL", candle_body("MSFT")),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, HarvestError::Decode(_)));
        assert!(candles.rows.lock().unwrap().is_empty());
        assert_eq!(queue.items.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_payload_symbol_falls_back_to_item() {
        let (_fundamentals, candles, queue, stores) = memory_stores();
        preload_queue(&queue, WorkKind::Medium, &["AAPL"]);

        let body = json!({ "candles": [], "empty": true });
        let outcome =
            transform_and_load(&stores, call_result(WorkKind::Medium, "AAPL", body))
                .await
                .unwrap();

        // 빈 구간(휴장일)도 그대로 저장된다
        assert_eq!(outcome, TransformOutcome::Candles(0));
        assert!(candles
            .rows
            .lock()
            .unwrap()
            .contains_key(&(WorkKind::Medium, "AAPL".to_string())));
        assert!(queue.items.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_leaves_item_queued() {
        let (_fundamentals, candles, queue, stores) = memory_stores();
        preload_queue(&queue, WorkKind::Short, &["AAPL"]);
        candles.fail.store(true, std::sync::atomic::Ordering::SeqCst);

        let err = transform_and_load(
            &stores,
            call_result(WorkKind::Short, "AAPL", candle_body("AAPL")),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, HarvestError::Database(_)));
        assert!(err.is_retryable());
        // 저장 실패 시 항목은 큐에 남아 다음 실행에서 재처리된다
        assert_eq!(queue.items.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_queue_removal_failure_keeps_stored_record() {
        let (_fundamentals, candles, queue, stores) = memory_stores();
        preload_queue(&queue, WorkKind::Short, &["AAPL"]);
        queue
            .fail_remove
            .store(true, std::sync::atomic::Ordering::SeqCst);

        let err = transform_and_load(
            &stores,
            call_result(WorkKind::Short, "AAPL", candle_body("AAPL")),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, HarvestError::Database(_)));
        // 레코드는 저장된 채로 남고 항목도 큐에 남는다.
        // 재처리 시 upsert가 no-op이므로 안전하다
        assert!(candles
            .rows
            .lock()
            .unwrap()
            .contains_key(&(WorkKind::Short, "AAPL".to_string())));
        assert_eq!(queue.items.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_transform_is_idempotent() {
        let (fundamentals, candles, queue, stores) = memory_stores();
        preload_queue(&queue, WorkKind::Macros, &["AAPL"]);
        preload_queue(&queue, WorkKind::Short, &["AAPL"]);

        let macros_body = json!({
            "AAPL": { "fundamental": { "marketCap": 2_850_000.0, "peRatio": 29.456 } }
        });

        transform_and_load(
            &stores,
            call_result(WorkKind::Macros, "AAPL", macros_body.clone()),
        )
        .await
        .unwrap();
        let first = fundamentals.profiles.lock().unwrap().clone();

        // 같은 결과를 다시 적용해도 문서는 하나, 내용은 동일하다
        transform_and_load(
            &stores,
            call_result(WorkKind::Macros, "AAPL", macros_body),
        )
        .await
        .unwrap();
        let second = fundamentals.profiles.lock().unwrap().clone();
        assert_eq!(first.len(), 1);
        assert_eq!(first, second);

        transform_and_load(
            &stores,
            call_result(WorkKind::Short, "AAPL", candle_body("AAPL")),
        )
        .await
        .unwrap();
        let first_rows = candles.rows.lock().unwrap().clone();
        transform_and_load(
            &stores,
            call_result(WorkKind::Short, "AAPL", candle_body("AAPL")),
        )
        .await
        .unwrap();
        let second_rows = candles.rows.lock().unwrap().clone();
        assert_eq!(first_rows.len(), 1);
        assert_eq!(first_rows, second_rows);
    }
}
