//! 테스트용 인메모리 저장소.

use super::EtlStores;
use async_trait::async_trait;
use harvest_core::{
    ApiAuditRecord, AuditLogStore, Candle, CandleHistory, CandleStore, FundamentalStore,
    HarvestError, HarvestResult, InstrumentProfile, WorkItem, WorkKind, WorkQueueStore,
};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub(crate) struct MemoryFundamentals {
    /// 전체 프로필 (직렬화된 형태로 보관하여 내용 비교에 사용)
    pub profiles: Mutex<HashMap<String, Value>>,
    /// 축약(시가총액만) 레코드
    pub partials: Mutex<HashMap<String, Decimal>>,
    /// 선별 질의용 10일 평균 거래량
    pub volumes: Mutex<HashMap<String, Decimal>>,
}

#[async_trait]
impl FundamentalStore for MemoryFundamentals {
    async fn upsert_profile(
        &self,
        symbol: &str,
        profile: &InstrumentProfile,
    ) -> HarvestResult<()> {
        let value = serde_json::to_value(profile)
            .map_err(|e| HarvestError::Internal(e.to_string()))?;
        self.profiles
            .lock()
            .unwrap()
            .insert(symbol.to_string(), value);
        Ok(())
    }

    async fn upsert_market_cap(&self, symbol: &str, market_cap: Decimal) -> HarvestResult<()> {
        self.partials
            .lock()
            .unwrap()
            .insert(symbol.to_string(), market_cap);
        Ok(())
    }

    async fn symbols_over_avg_volume(
        &self,
        min_avg_volume: Decimal,
    ) -> HarvestResult<Vec<String>> {
        let mut symbols: Vec<String> = self
            .volumes
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, vol)| **vol > min_avg_volume)
            .map(|(sym, _)| sym.clone())
            .collect();
        symbols.sort();
        Ok(symbols)
    }
}

#[derive(Default)]
pub(crate) struct MemoryCandles {
    pub rows: Mutex<HashMap<(WorkKind, String), Vec<Candle>>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl CandleStore for MemoryCandles {
    async fn upsert_history(&self, kind: WorkKind, history: &CandleHistory) -> HarvestResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(HarvestError::Database("candle upsert failed".to_string()));
        }
        self.rows
            .lock()
            .unwrap()
            .insert((kind, history.symbol.clone()), history.candles.clone());
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MemoryQueue {
    pub items: Mutex<BTreeSet<(WorkKind, String)>>,
    pub fail_remove: AtomicBool,
}

#[async_trait]
impl WorkQueueStore for MemoryQueue {
    async fn enqueue_many(&self, kind: WorkKind, symbols: &[String]) -> HarvestResult<u64> {
        let mut items = self.items.lock().unwrap();
        let mut queued = 0u64;
        for symbol in symbols {
            if items.insert((kind, symbol.clone())) {
                queued += 1;
            }
        }
        Ok(queued)
    }

    async fn remove(&self, item: &WorkItem) -> HarvestResult<()> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(HarvestError::Database("queue delete failed".to_string()));
        }
        // 없는 키 삭제는 no-op
        self.items
            .lock()
            .unwrap()
            .remove(&(item.kind, item.symbol.clone()));
        Ok(())
    }

    async fn fetch_pending(&self, kind: Option<WorkKind>) -> HarvestResult<Vec<WorkItem>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| kind.map(|want| want == *k).unwrap_or(true))
            .map(|(k, s)| WorkItem::new(*k, s.clone()))
            .collect())
    }

    async fn pending_counts(&self) -> HarvestResult<Vec<(WorkKind, i64)>> {
        let items = self.items.lock().unwrap();
        let mut counts: Vec<(WorkKind, i64)> = Vec::new();
        for kind in WorkKind::ALL {
            let count = items.iter().filter(|(k, _)| *k == kind).count() as i64;
            if count > 0 {
                counts.push((kind, count));
            }
        }
        Ok(counts)
    }
}

#[derive(Default)]
pub(crate) struct MemoryAudit {
    pub records: Mutex<Vec<ApiAuditRecord>>,
}

#[async_trait]
impl AuditLogStore for MemoryAudit {
    async fn record(&self, record: &ApiAuditRecord) -> HarvestResult<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// 인메모리 저장소 묶음을 생성합니다.
pub(crate) fn memory_stores() -> (
    Arc<MemoryFundamentals>,
    Arc<MemoryCandles>,
    Arc<MemoryQueue>,
    EtlStores,
) {
    let fundamentals = Arc::new(MemoryFundamentals::default());
    let candles = Arc::new(MemoryCandles::default());
    let queue = Arc::new(MemoryQueue::default());
    let stores = EtlStores {
        fundamentals: fundamentals.clone(),
        candles: candles.clone(),
        queue: queue.clone(),
    };
    (fundamentals, candles, queue, stores)
}

/// 큐에 작업 항목을 미리 넣어둡니다.
pub(crate) fn preload_queue(queue: &MemoryQueue, kind: WorkKind, symbols: &[&str]) {
    let mut items = queue.items.lock().unwrap();
    for symbol in symbols {
        items.insert((kind, symbol.to_string()));
    }
}
