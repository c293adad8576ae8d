//! 접근 토큰 제공자.
//!
//! 토큰 발급과 갱신은 외부 서비스의 책임입니다. 클라이언트는 토큰을
//! 시도 간에 캐시하지 않고, 매 시도마다 제공자에게 현재 토큰을 새로
//! 조회합니다.

use crate::error::BrokerError;
use async_trait::async_trait;

/// 현재 유효한 bearer 토큰을 제공하는 trait.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// 현재 토큰을 반환합니다. 구현체가 만료/갱신을 책임집니다.
    async fn fetch(&self) -> Result<String, BrokerError>;
}

/// 외부에서 갱신된 토큰을 주입받는 고정 토큰 제공자.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn fetch(&self) -> Result<String, BrokerError> {
        if self.token.is_empty() {
            return Err(BrokerError::Unauthorized(
                "access token is not configured".to_string(),
            ));
        }
        Ok(self.token.clone())
    }
}
