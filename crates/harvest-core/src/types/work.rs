//! 수집 작업 종류 및 작업 항목.
//!
//! `WorkKind`는 엔드포인트, 질의 형태, 저장 대상 컬렉션을 결정하는
//! 닫힌 enum입니다. 책임별 분기는 모두 exhaustive match로 작성되어
//! 새 종류 추가 시 컴파일러가 누락을 잡아냅니다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 수집 작업 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkKind {
    /// 펀더멘털 수집 (instruments 조회)
    Macros,
    /// 30분봉, 최근 15일
    Medium,
    /// 15분봉, 최근 14시간
    Short,
    /// 15분봉, 최근 14시간 (시그널 계산용 별도 컬렉션)
    Signals,
}

impl WorkKind {
    /// 전체 작업 종류.
    pub const ALL: [WorkKind; 4] = [
        WorkKind::Macros,
        WorkKind::Medium,
        WorkKind::Short,
        WorkKind::Signals,
    ];

    /// 큐/감사 로그 행에 저장되는 문자열 표현.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Macros => "macros",
            Self::Medium => "medium",
            Self::Short => "short",
            Self::Signals => "signals",
        }
    }
}

impl fmt::Display for WorkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WorkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "macros" => Ok(Self::Macros),
            "medium" => Ok(Self::Medium),
            "short" => Ok(Self::Short),
            "signals" => Ok(Self::Signals),
            _ => Err(format!("Unknown work kind: {}", s)),
        }
    }
}

/// 대기 중인 수집 작업 항목. `(kind, symbol)`이 식별자입니다.
///
/// 선별 단계가 생성하고, 변환 단계가 저장 성공 후 큐에서 제거할 때까지
/// 작업 큐가 소유합니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkItem {
    pub kind: WorkKind,
    pub symbol: String,
}

impl WorkItem {
    /// 새 작업 항목을 생성합니다.
    pub fn new(kind: WorkKind, symbol: impl Into<String>) -> Self {
        Self {
            kind,
            symbol: symbol.into(),
        }
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.symbol)
    }
}
