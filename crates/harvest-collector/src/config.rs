//! 환경변수 기반 설정 모듈.

use std::time::Duration;

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 데이터베이스 URL
    pub database_url: String,
    /// 브로커 API 설정
    pub broker: BrokerConfig,
    /// 큐 적재 설정
    pub enqueue: EnqueueConfig,
    /// 큐 처리 설정
    pub process: ProcessConfig,
}

/// 브로커 API 설정
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// API 키 (apikey 질의 파라미터)
    pub api_key: String,
    /// 접근 토큰 (외부 갱신 서비스가 채워둔 현재 값)
    pub access_token: String,
    /// REST API 기본 URL
    pub base_url: String,
    /// 시도당 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// 최대 시도 횟수
    pub max_attempts: u32,
}

/// 큐 적재 설정
#[derive(Debug, Clone)]
pub struct EnqueueConfig {
    /// 선별 기준: 10일 평균 거래량 하한 (주 단위)
    pub min_avg_volume: i64,
}

/// 큐 처리 설정
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    /// 항목 간 API 요청 딜레이 (밀리초)
    pub request_delay_ms: u64,
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL").map_err(|_| {
            crate::error::CollectorError::Config(
                "DATABASE_URL 환경변수가 설정되지 않았습니다".to_string(),
            )
        })?;

        Ok(Self {
            database_url,
            broker: BrokerConfig {
                // 비어 있으면 큐 처리 시점에 검증된다
                api_key: std::env::var("TD_API_KEY").unwrap_or_default(),
                access_token: std::env::var("TD_ACCESS_TOKEN").unwrap_or_default(),
                base_url: std::env::var("TD_API_BASE_URL")
                    .unwrap_or_else(|_| harvest_broker::DEFAULT_BASE_URL.to_string()),
                timeout_secs: env_var_parse("BROKER_TIMEOUT_SECS", 30),
                max_attempts: env_var_parse("BROKER_MAX_ATTEMPTS", 10),
            },
            enqueue: EnqueueConfig {
                min_avg_volume: env_var_parse("ENQUEUE_MIN_AVG_VOLUME", 2_000_000),
            },
            process: ProcessConfig {
                request_delay_ms: env_var_parse("PROCESS_REQUEST_DELAY_MS", 500),
            },
        })
    }
}

impl ProcessConfig {
    /// 항목 간 딜레이를 Duration으로 반환
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
