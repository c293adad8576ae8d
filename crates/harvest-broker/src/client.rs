//! 브로커 REST API 클라이언트.
//!
//! 모든 호출은 재시도 정책 아래에서 실행됩니다. 시도마다 토큰 제공자에게
//! bearer 토큰을 새로 조회하고, 원시 응답을 감사 로그에 남긴 뒤
//! 재시도/실패를 판정합니다. 감사 로그 기록은 best-effort이며 실패해도
//! 시도 순서를 중단시키지 않습니다.

use crate::error::BrokerError;
use crate::request::{self, BrokerEndpoints};
use crate::retry::RetryPolicy;
use crate::token::AccessTokenProvider;
use chrono::Utc;
use harvest_core::{ApiAuditRecord, ApiCallResult, AuditLogStore, WorkItem};
use reqwest::Client;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

/// 브로커 REST API 클라이언트.
pub struct TdApiClient {
    http: Client,
    endpoints: BrokerEndpoints,
    api_key: String,
    token: Arc<dyn AccessTokenProvider>,
    audit: Arc<dyn AuditLogStore>,
    policy: RetryPolicy,
}

impl TdApiClient {
    /// 새 클라이언트를 생성합니다.
    ///
    /// `timeout_secs`는 시도당 요청 전체에 적용되는 상한입니다.
    ///
    /// # Errors
    /// HTTP 클라이언트 생성에 실패하면 `BrokerError::NetworkError`를
    /// 반환합니다.
    pub fn new(
        endpoints: BrokerEndpoints,
        api_key: impl Into<String>,
        timeout_secs: u64,
        token: Arc<dyn AccessTokenProvider>,
        audit: Arc<dyn AuditLogStore>,
    ) -> Result<Self, BrokerError> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| BrokerError::NetworkError(format!("HTTP client 생성 실패: {}", e)))?;

        Ok(Self {
            http,
            endpoints,
            api_key: api_key.into(),
            token,
            audit,
            policy: RetryPolicy::default(),
        })
    }

    /// 재시도 정책을 교체합니다.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 작업 항목에 해당하는 API 호출을 실행합니다.
    ///
    /// 일시 에러는 정책의 지연 공식에 따라 시도 상한까지 재시도하고,
    /// 치명 에러(401, 그 외 4xx)는 즉시 반환합니다. 상한을 소진하면
    /// 마지막으로 분류된 에러를 반환하며 부분 결과는 없습니다.
    pub async fn call(&self, item: &WorkItem) -> Result<ApiCallResult, BrokerError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.execute(item).await {
                Ok(body) => {
                    info!(symbol = %item.symbol, work = %item.kind, attempt, "API 호출 성공");
                    return Ok(ApiCallResult::new(body, item.clone()));
                }
                Err(e) if e.is_retryable() && attempt < self.policy.max_attempts => {
                    let delay = self.policy.delay_for(attempt - 1);
                    warn!(
                        symbol = %item.symbol,
                        work = %item.kind,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "일시 에러, 재시도 대기"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    error!(
                        symbol = %item.symbol,
                        work = %item.kind,
                        attempt,
                        error = %e,
                        "API 호출 실패"
                    );
                    return Err(e);
                }
            }
        }
    }

    /// 단일 시도를 실행합니다.
    async fn execute(&self, item: &WorkItem) -> Result<Map<String, Value>, BrokerError> {
        // 토큰은 시도 간에 캐시하지 않는다
        let token = self.token.fetch().await?;
        let url = self.endpoints.url_for(item);
        let query = request::build_query(item, &self.api_key, Utc::now());

        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .query(&query)
            .send()
            .await
            .map_err(|e| BrokerError::NetworkError(e.to_string()))?;

        let status = response.status().as_u16();
        let path = response.url().path().to_string();
        let text = response
            .text()
            .await
            .map_err(|e| BrokerError::NetworkError(e.to_string()))?;

        let parsed: Result<Value, _> = serde_json::from_str(&text);

        // 재시도/실패 판정 전에 교환을 기록한다
        let body_for_audit = parsed.as_ref().ok().cloned().unwrap_or(Value::Null);
        let record = ApiAuditRecord::new(item.clone(), status, path, body_for_audit);
        if let Err(e) = self.audit.record(&record).await {
            warn!(symbol = %item.symbol, work = %item.kind, error = %e, "응답 감사 로그 기록 실패");
        }

        if let Some(err) = BrokerError::from_status(status, &text) {
            return Err(err);
        }

        match parsed {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(BrokerError::ParseError(
                "응답 본문이 JSON 객체가 아님".to_string(),
            )),
            Err(e) => Err(BrokerError::ParseError(e.to_string())),
        }
    }
}
