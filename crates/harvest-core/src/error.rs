//! ETL 파이프라인의 에러 타입.
//!
//! 이 모듈은 변환/적재 경계에서 사용되는 에러 타입을 정의합니다.
//! API 호출 단계의 에러 분류는 `harvest-broker`의 `BrokerError`가 담당합니다.

use thiserror::Error;

/// 핵심 파이프라인 에러.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// 디코딩 에러 (페이로드가 기대한 형태와 다름)
    #[error("디코딩 에러: {0}")]
    Decode(String),

    /// 데이터베이스 에러
    #[error("데이터베이스 에러: {0}")]
    Database(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 파이프라인 작업을 위한 Result 타입.
pub type HarvestResult<T> = Result<T, HarvestError>;

impl HarvestError {
    /// 다음 실행에서 재처리하면 해소될 수 있는 에러인지 확인합니다.
    ///
    /// 저장 실패는 작업 항목을 큐에 남겨두므로 다음 실행에서 전체
    /// fetch-and-load가 다시 시도됩니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, HarvestError::Database(_))
    }
}

impl From<serde_json::Error> for HarvestError {
    fn from(err: serde_json::Error) -> Self {
        HarvestError::Decode(err.to_string())
    }
}
