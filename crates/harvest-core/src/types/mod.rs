//! 공통 값 타입.

pub mod decimal;
pub mod work;

pub use decimal::{round_opt, DecimalExt, DISPLAY_DECIMALS};
pub use work::{WorkItem, WorkKind};
