//! 컬렉션별 저장소 trait.
//!
//! 저장소는 컬렉션마다 하나의 메서드 집합으로 추상화되며, 한 번
//! 생성되어 필요한 컴포넌트에 참조로 전달됩니다. 모든 쓰기는 키 기반
//! upsert이므로 재처리 시에도 중복이 생기지 않습니다.

use crate::domain::candle::CandleHistory;
use crate::domain::fundamental::InstrumentProfile;
use crate::domain::audit::ApiAuditRecord;
use crate::error::HarvestResult;
use crate::types::work::{WorkItem, WorkKind};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// 펀더멘털 컬렉션 저장소.
#[async_trait]
pub trait FundamentalStore: Send + Sync {
    /// 종목 프로필 전체를 upsert합니다 (동일 키의 기존 레코드는 통째로 대체).
    async fn upsert_profile(&self, symbol: &str, profile: &InstrumentProfile)
        -> HarvestResult<()>;

    /// 시가총액만 담은 축약 레코드를 upsert합니다.
    async fn upsert_market_cap(&self, symbol: &str, market_cap: Decimal) -> HarvestResult<()>;

    /// 10일 평균 거래량이 기준을 넘는 종목을 조회합니다 (선별 질의).
    async fn symbols_over_avg_volume(&self, min_avg_volume: Decimal)
        -> HarvestResult<Vec<String>>;
}

/// 캔들 히스토리 컬렉션 저장소. Medium/Short/Signals가 같은 레코드
/// 형태를 공유하되 각각 별도 컬렉션에 저장됩니다.
#[async_trait]
pub trait CandleStore: Send + Sync {
    /// 작업 종류에 해당하는 컬렉션에 히스토리를 종목 키로 upsert합니다.
    async fn upsert_history(&self, kind: WorkKind, history: &CandleHistory) -> HarvestResult<()>;
}

/// 작업 큐 저장소. 대기 중인 수집 의무의 내구 기록입니다.
#[async_trait]
pub trait WorkQueueStore: Send + Sync {
    /// 선별된 심볼들을 `(kind, symbol)` 키로 적재합니다.
    /// 이미 존재하는 키는 무시되므로 같은 선별을 다시 실행해도
    /// 중복이 생기지 않습니다. 새로 적재된 항목 수를 반환합니다.
    async fn enqueue_many(&self, kind: WorkKind, symbols: &[String]) -> HarvestResult<u64>;

    /// 작업 항목을 키로 삭제합니다. 없는 키 삭제는 에러가 아닙니다.
    async fn remove(&self, item: &WorkItem) -> HarvestResult<()>;

    /// 호출 시점의 대기 항목 커서를 반환합니다.
    ///
    /// 단일 워커가 순차 처리하는 것을 전제로 하며, 클레임 단계는
    /// 없습니다. 병렬 워커를 돌리려면 별도의 클레임이 필요합니다.
    async fn fetch_pending(&self, kind: Option<WorkKind>) -> HarvestResult<Vec<WorkItem>>;

    /// 작업 종류별 대기 항목 수를 반환합니다.
    async fn pending_counts(&self) -> HarvestResult<Vec<(WorkKind, i64)>>;
}

/// HTTP 응답 감사 로그 저장소.
#[async_trait]
pub trait AuditLogStore: Send + Sync {
    /// 교환 한 건을 기록합니다. `(kind, symbol)` 키 upsert 방식입니다.
    async fn record(&self, record: &ApiAuditRecord) -> HarvestResult<()>;
}
