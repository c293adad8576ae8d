//! 수집 통계 구조체.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 큐 처리 통계
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionStats {
    /// 처리 시도한 항목 수
    pub total: usize,
    /// 성공 횟수
    pub success: usize,
    /// 에러 횟수 (항목은 큐에 남아 다음 실행에서 재처리)
    pub errors: usize,
    /// 시가총액 미달로 축약 저장된 횟수
    pub partial: usize,
    /// 저장된 총 캔들 수
    pub total_candles: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl CollectionStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            total = self.total,
            success = self.success,
            errors = self.errors,
            partial = self.partial,
            total_candles = self.total_candles,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "처리 완료"
        );
    }
}
