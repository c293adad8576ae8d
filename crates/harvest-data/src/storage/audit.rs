//! HTTP 응답 감사 로그 repository.

use super::db_err;
use async_trait::async_trait;
use harvest_core::{ApiAuditRecord, AuditLogStore, HarvestResult};
use sqlx::postgres::PgPool;

/// `api_response_log` 테이블 repository.
///
/// 성공/실패와 무관하게 모든 HTTP 교환의 원시 응답을 보관합니다.
/// 관측/분석용이며, 같은 `(work, symbol)` 키에는 마지막 교환이
/// 남습니다.
#[derive(Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogStore for AuditLogRepository {
    async fn record(&self, record: &ApiAuditRecord) -> HarvestResult<()> {
        sqlx::query(
            r#"
            INSERT INTO api_response_log (work, symbol, status, path, body, logged_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            ON CONFLICT (work, symbol)
            DO UPDATE SET
                status = EXCLUDED.status,
                path = EXCLUDED.path,
                body = EXCLUDED.body,
                logged_at = NOW()
            "#,
        )
        .bind(record.item.kind.as_str())
        .bind(&record.item.symbol)
        .bind(record.status_code as i32)
        .bind(&record.path)
        .bind(&record.body)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}
