//! 도메인 레코드 및 저장소 trait.

pub mod audit;
pub mod candle;
pub mod fundamental;
pub mod store;

pub use audit::{ApiAuditRecord, ApiCallResult};
pub use candle::{Candle, CandleHistory, PriceHistoryPayload};
pub use fundamental::{FundamentalSnapshot, InstrumentProfile, MARKET_CAP_FLOOR_MILLIONS};
pub use store::{AuditLogStore, CandleStore, FundamentalStore, WorkQueueStore};
