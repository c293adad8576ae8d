//! 재시도 정책.
//!
//! 정책은 순수하게 유지됩니다: 에러 분류는 `BrokerError`의
//! `is_retryable`/`is_fatal`이, 지연은 시도 번호만의 함수가 담당하고,
//! 클라이언트의 재시도 루프가 이 둘을 조합해 실행합니다.

use std::time::Duration;

/// 재시도 정책. 시도 상한과 지연 공식을 담습니다.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 최대 시도 횟수 (첫 시도 포함)
    pub max_attempts: u32,
    /// 지수 백오프 기본 단위
    pub backoff_base: Duration,
    /// 시도가 거듭될수록 커지는 선형 가중 단위
    pub linear_step: Duration,
    /// 모든 재시도에 더해지는 고정 대기
    pub fixed_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            backoff_base: Duration::from_millis(100),
            linear_step: Duration::from_millis(750),
            fixed_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// `retry`번째 재시도 전 대기 시간 (0부터 셉니다).
    ///
    /// `backoff_base·2ⁿ + linear_step·⌊n·1.6⌋ + fixed_delay`
    ///
    /// 시도 상한 외에 별도 상한은 없습니다.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponential = self.backoff_base.saturating_mul(1u32 << retry.min(20));
        let ramp = self.linear_step.saturating_mul(retry * 16 / 10);
        exponential
            .saturating_add(ramp)
            .saturating_add(self.fixed_delay)
    }

    /// 대기 없는 정책. 테스트와 시뮬레이션에서 사용합니다.
    pub fn without_delay(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff_base: Duration::ZERO,
            linear_step: Duration::ZERO,
            fixed_delay: Duration::ZERO,
        }
    }
}
