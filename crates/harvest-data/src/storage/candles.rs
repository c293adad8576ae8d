//! 캔들 히스토리 repository.

use super::db_err;
use async_trait::async_trait;
use harvest_core::{CandleHistory, CandleStore, HarvestError, HarvestResult, WorkKind};
use sqlx::postgres::PgPool;
use tracing::debug;

/// 캔들 히스토리 테이블 repository.
///
/// Medium/Short/Signals는 레코드 형태가 같지만 각각 별도 테이블에
/// 저장됩니다. 종목당 한 행이며 성공한 수집마다 통째로 대체됩니다.
#[derive(Clone)]
pub struct CandleRepository {
    pool: PgPool,
}

impl CandleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// 작업 종류에 해당하는 테이블 이름.
fn table_for(kind: WorkKind) -> HarvestResult<&'static str> {
    match kind {
        WorkKind::Medium => Ok("candles_medium"),
        WorkKind::Short => Ok("candles_short"),
        WorkKind::Signals => Ok("candles_signals"),
        WorkKind::Macros => Err(HarvestError::InvalidInput(
            "macros 작업에는 캔들 테이블이 없습니다".to_string(),
        )),
    }
}

#[async_trait]
impl CandleStore for CandleRepository {
    async fn upsert_history(&self, kind: WorkKind, history: &CandleHistory) -> HarvestResult<()> {
        let table = table_for(kind)?;
        let candles = serde_json::to_value(&history.candles)
            .map_err(|e| HarvestError::Internal(format!("캔들 직렬화 실패: {}", e)))?;

        let sql = format!(
            r#"
            INSERT INTO {table} (symbol, candles, fetched_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (symbol)
            DO UPDATE SET
                candles = EXCLUDED.candles,
                fetched_at = NOW()
            "#
        );

        sqlx::query(&sql)
            .bind(&history.symbol)
            .bind(candles)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        debug!(
            symbol = %history.symbol,
            table = table,
            candles = history.len(),
            "캔들 히스토리 upsert 완료"
        );
        Ok(())
    }
}
