//! 수집 모듈.

pub mod enqueue;
pub mod process;
pub mod transform;

#[cfg(test)]
pub(crate) mod testutil;

pub use enqueue::enqueue_work;
pub use process::process_queue;
pub use transform::{transform_and_load, TransformOutcome};

use harvest_core::{CandleStore, FundamentalStore, WorkQueueStore};
use std::sync::Arc;

/// 컬렉션별 저장소 묶음.
///
/// 한 번 생성되어 필요한 모듈에 참조로 전달됩니다. 전역 상태로
/// 접근하지 않습니다.
pub struct EtlStores {
    pub fundamentals: Arc<dyn FundamentalStore>,
    pub candles: Arc<dyn CandleStore>,
    pub queue: Arc<dyn WorkQueueStore>,
}
