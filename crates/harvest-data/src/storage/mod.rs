//! PostgreSQL 스토리지 구현.

pub mod audit;
pub mod candles;
pub mod db;
pub mod fundamentals;
pub mod queue;

use harvest_core::HarvestError;

/// sqlx 에러를 파이프라인 에러로 변환합니다.
pub(crate) fn db_err(err: sqlx::Error) -> HarvestError {
    HarvestError::Database(err.to_string())
}
