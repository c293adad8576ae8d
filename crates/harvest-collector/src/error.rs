//! 에러 타입 정의.

use harvest_broker::BrokerError;
use harvest_core::HarvestError;
use std::fmt;

/// Collector 에러 타입
#[derive(Debug)]
pub enum CollectorError {
    /// 저장소/변환 에러
    Store(HarvestError),
    /// 브로커 API 에러
    Broker(BrokerError),
    /// 설정 에러
    Config(String),
    /// 일반 에러
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for CollectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "Store error: {}", e),
            Self::Broker(e) => write!(f, "Broker error: {}", e),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Other(e) => write!(f, "Error: {}", e),
        }
    }
}

impl std::error::Error for CollectorError {}

impl From<HarvestError> for CollectorError {
    fn from(err: HarvestError) -> Self {
        Self::Store(err)
    }
}

impl From<BrokerError> for CollectorError {
    fn from(err: BrokerError) -> Self {
        Self::Broker(err)
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CollectorError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::Other(err)
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
