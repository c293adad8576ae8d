//! API 호출 결과 및 응답 감사 레코드.

use crate::types::work::WorkItem;
use serde::Serialize;
use serde_json::{Map, Value};

/// 성공한 API 호출의 결과. 변환 단계가 한 번 소비하고 버립니다.
#[derive(Debug, Clone)]
pub struct ApiCallResult {
    /// 디코딩된 응답 본문 (최상위 JSON 객체)
    pub body: Map<String, Value>,
    /// 호출을 유발한 작업 항목
    pub item: WorkItem,
}

impl ApiCallResult {
    pub fn new(body: Map<String, Value>, item: WorkItem) -> Self {
        Self { body, item }
    }
}

/// HTTP 교환 한 건의 감사 레코드.
///
/// 성공/실패와 무관하게 재시도·실패 판정 전에 기록됩니다. 관측용이며
/// 제어 흐름에는 관여하지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiAuditRecord {
    pub item: WorkItem,
    pub status_code: u16,
    pub path: String,
    pub body: Value,
}

impl ApiAuditRecord {
    pub fn new(item: WorkItem, status_code: u16, path: impl Into<String>, body: Value) -> Self {
        Self {
            item,
            status_code,
            path: path.into(),
            body,
        }
    }
}
