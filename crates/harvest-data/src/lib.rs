//! 데이터 저장.
//!
//! 이 crate는 다음을 제공합니다:
//! - PostgreSQL 연결 풀 래퍼 및 마이그레이션
//! - 컬렉션별 repository 구현 (펀더멘털, 캔들, 작업 큐, 응답 감사 로그)
//!
//! 모든 쓰기는 키 기반 upsert로, 재처리 시에도 중복이 생기지 않습니다.

pub mod storage;

pub use storage::audit::AuditLogRepository;
pub use storage::candles::CandleRepository;
pub use storage::db::{Database, DatabaseConfig};
pub use storage::fundamentals::FundamentalRepository;
pub use storage::queue::WorkQueueRepository;
