//! 브로커 API 에러 타입.

use thiserror::Error;

/// 브로커 API 호출 에러.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// 인증 에러 (HTTP 401). 재시도하지 않고 즉시 반환됩니다.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 요청 한도 초과 (HTTP 429)
    #[error("Rate limit exceeded")]
    RateLimited,

    /// 서버 측 에러 (HTTP 5xx)
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// 그 외 클라이언트 요청 에러 (4xx). 재시도하지 않습니다.
    #[error("Request rejected with status {status}: {message}")]
    ClientRequest { status: u16, message: String },

    /// 네트워크/전송 에러
    #[error("Network error: {0}")]
    NetworkError(String),

    /// 응답 본문 파싱 에러
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl BrokerError {
    /// HTTP 상태 코드를 에러로 분류합니다. 성공 상태면 `None`.
    pub fn from_status(status: u16, body: &str) -> Option<Self> {
        match status {
            401 => Some(Self::Unauthorized(
                "access token rejected (HTTP 401)".to_string(),
            )),
            429 => Some(Self::RateLimited),
            s if s >= 500 => Some(Self::ServerError {
                status: s,
                message: truncate_body(body),
            }),
            s if s >= 400 => Some(Self::ClientRequest {
                status: s,
                message: truncate_body(body),
            }),
            _ => None,
        }
    }

    /// 재시도 가능한 에러인지 확인.
    ///
    /// 전송/파싱 실패는 상태 코드가 없는 일시 장애로 간주하여 같은
    /// 시도 상한 안에서 재시도합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BrokerError::RateLimited
                | BrokerError::ServerError { .. }
                | BrokerError::NetworkError(_)
                | BrokerError::ParseError(_)
        )
    }

    /// 재시도하면 안 되는 치명적 에러인지 확인.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BrokerError::Unauthorized(_) | BrokerError::ClientRequest { .. }
        )
    }
}

impl From<reqwest::Error> for BrokerError {
    fn from(err: reqwest::Error) -> Self {
        BrokerError::NetworkError(err.to_string())
    }
}

/// 감사 로그와 별개로 에러 메시지에 싣는 본문은 짧게 자릅니다.
fn truncate_body(body: &str) -> String {
    const MAX_CHARS: usize = 200;
    if body.chars().count() <= MAX_CHARS {
        body.to_string()
    } else {
        body.chars().take(MAX_CHARS).collect()
    }
}
