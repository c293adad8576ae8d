//! 작업 큐 적재 모듈.
//!
//! 선별 조건(10일 평균 거래량) 또는 명시적 심볼 목록으로 작업 항목을
//! 큐에 적재합니다. 큐 키가 `(kind, symbol)`이므로 같은 선별을 다시
//! 실행해도 중복이 생기지 않습니다.

use super::EtlStores;
use crate::Result;
use harvest_core::WorkKind;
use rust_decimal::Decimal;

/// 선별된 심볼들을 작업 큐에 적재합니다. 새로 적재된 항목 수를
/// 반환합니다.
///
/// `symbols`가 주어지면 쉼표로 구분된 목록을 그대로 사용하고, 없으면
/// 펀더멘털 컬렉션에서 거래량 기준으로 선별합니다.
pub async fn enqueue_work(
    stores: &EtlStores,
    kind: WorkKind,
    symbols: Option<String>,
    min_avg_volume: i64,
) -> Result<u64> {
    let selection: Vec<String> = match symbols {
        Some(ref s) => {
            let syms: Vec<String> = s
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
            tracing::info!(work = %kind, count = syms.len(), "지정 심볼 적재");
            syms
        }
        None => {
            let syms = stores
                .fundamentals
                .symbols_over_avg_volume(Decimal::from(min_avg_volume))
                .await?;
            tracing::info!(
                work = %kind,
                count = syms.len(),
                min_avg_volume,
                "거래량 기준 선별 완료"
            );
            syms
        }
    };

    if selection.is_empty() {
        tracing::warn!(work = %kind, "적재할 심볼이 없습니다");
        return Ok(0);
    }

    let queued = stores.queue.enqueue_many(kind, &selection).await?;
    tracing::info!(work = %kind, selected = selection.len(), queued, "작업 큐 적재 완료");
    Ok(queued)
}
