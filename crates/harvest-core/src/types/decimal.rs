//! 금융 수치 반올림 유틸리티.
//!
//! 저장되는 모든 금액/비율/마진 필드는 저장 전에 표시 정밀도로
//! 반올림됩니다.

use rust_decimal::Decimal;

/// 저장 전 표시 정밀도 (소수점 자릿수).
pub const DISPLAY_DECIMALS: u32 = 2;

/// Decimal 연산을 위한 확장 트레이트.
pub trait DecimalExt {
    /// 표시 정밀도로 반올림합니다.
    fn round_display(&self) -> Decimal;
}

impl DecimalExt for Decimal {
    fn round_display(&self) -> Decimal {
        self.round_dp_with_strategy(
            DISPLAY_DECIMALS,
            rust_decimal::RoundingStrategy::MidpointAwayFromZero,
        )
    }
}

/// 선택적 필드를 제자리에서 반올림합니다. 값이 없으면 건너뜁니다.
pub fn round_opt(value: &mut Option<Decimal>) {
    if let Some(v) = value {
        *v = v.round_display();
    }
}
