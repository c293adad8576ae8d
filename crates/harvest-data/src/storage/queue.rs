//! 작업 큐 repository.

use super::db_err;
use async_trait::async_trait;
use harvest_core::{HarvestError, HarvestResult, WorkItem, WorkKind, WorkQueueStore};
use sqlx::postgres::PgPool;
use tracing::debug;

/// `api_work_queue` 테이블 repository.
///
/// `(work, symbol)`이 기본 키이므로 같은 선별을 다시 적재해도 중복이
/// 생기지 않고, 없는 키 삭제는 no-op입니다.
#[derive(Clone)]
pub struct WorkQueueRepository {
    pool: PgPool,
}

impl WorkQueueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn parse_kind(work: &str) -> HarvestResult<WorkKind> {
    work.parse()
        .map_err(|e: String| HarvestError::Decode(format!("큐 행의 작업 종류 파싱 실패: {}", e)))
}

#[async_trait]
impl WorkQueueStore for WorkQueueRepository {
    async fn enqueue_many(&self, kind: WorkKind, symbols: &[String]) -> HarvestResult<u64> {
        let mut queued = 0u64;
        for symbol in symbols {
            let result = sqlx::query(
                r#"
                INSERT INTO api_work_queue (work, symbol, enqueued_at)
                VALUES ($1, $2, NOW())
                ON CONFLICT (work, symbol) DO NOTHING
                "#,
            )
            .bind(kind.as_str())
            .bind(symbol)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

            queued += result.rows_affected();
        }

        debug!(work = %kind, selected = symbols.len(), queued, "작업 큐 적재");
        Ok(queued)
    }

    async fn remove(&self, item: &WorkItem) -> HarvestResult<()> {
        sqlx::query(
            r#"
            DELETE FROM api_work_queue
            WHERE work = $1 AND symbol = $2
            "#,
        )
        .bind(item.kind.as_str())
        .bind(&item.symbol)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn fetch_pending(&self, kind: Option<WorkKind>) -> HarvestResult<Vec<WorkItem>> {
        let rows: Vec<(String, String)> = match kind {
            Some(k) => {
                sqlx::query_as(
                    r#"
                    SELECT work, symbol
                    FROM api_work_queue
                    WHERE work = $1
                    ORDER BY enqueued_at, symbol
                    "#,
                )
                .bind(k.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as(
                    r#"
                    SELECT work, symbol
                    FROM api_work_queue
                    ORDER BY enqueued_at, symbol
                    "#,
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(db_err)?;

        rows.into_iter()
            .map(|(work, symbol)| Ok(WorkItem::new(parse_kind(&work)?, symbol)))
            .collect()
    }

    async fn pending_counts(&self) -> HarvestResult<Vec<(WorkKind, i64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT work, COUNT(*)
            FROM api_work_queue
            GROUP BY work
            ORDER BY work
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter()
            .map(|(work, count)| Ok((parse_kind(&work)?, count)))
            .collect()
    }
}
