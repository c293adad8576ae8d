//! 큐 처리 모듈.
//!
//! 호출 시점의 큐 커서를 단일 워커가 순차 처리합니다. 항목 간 실패는
//! 서로 격리됩니다: 한 항목이 실패해도 나머지 항목 처리는 계속되고,
//! 실패한 항목은 큐에 남아 다음 실행에서 재처리됩니다.

use super::transform::{self, TransformOutcome};
use super::EtlStores;
use crate::config::ProcessConfig;
use crate::stats::CollectionStats;
use crate::Result;
use harvest_broker::TdApiClient;
use harvest_core::WorkKind;
use std::time::Instant;

/// 대기 중인 작업을 순서대로 처리합니다.
pub async fn process_queue(
    client: &TdApiClient,
    stores: &EtlStores,
    config: &ProcessConfig,
    work: Option<WorkKind>,
) -> Result<CollectionStats> {
    let start = Instant::now();
    let mut stats = CollectionStats::new();

    let items = stores.queue.fetch_pending(work).await?;
    if items.is_empty() {
        tracing::warn!("처리할 작업이 없습니다");
        stats.elapsed = start.elapsed();
        return Ok(stats);
    }

    tracing::info!(count = items.len(), "대기 작업 조회 완료");

    for (idx, item) in items.iter().enumerate() {
        stats.total += 1;

        tracing::debug!(
            symbol = %item.symbol,
            work = %item.kind,
            progress = format!("{}/{}", idx + 1, items.len()),
            "처리 시작"
        );

        match client.call(item).await {
            Ok(result) => match transform::transform_and_load(stores, result).await {
                Ok(TransformOutcome::Fundamentals) => stats.success += 1,
                Ok(TransformOutcome::PartialFundamentals) => {
                    stats.success += 1;
                    stats.partial += 1;
                }
                Ok(TransformOutcome::Candles(count)) => {
                    stats.success += 1;
                    stats.total_candles += count;
                }
                Err(e) => {
                    stats.errors += 1;
                    tracing::error!(
                        symbol = %item.symbol,
                        work = %item.kind,
                        error = %e,
                        retryable = e.is_retryable(),
                        "변환·적재 실패"
                    );
                }
            },
            Err(e) => {
                stats.errors += 1;
                tracing::error!(
                    symbol = %item.symbol,
                    work = %item.kind,
                    error = %e,
                    "API 호출 실패"
                );
            }
        }

        // Rate limiting
        if idx + 1 < items.len() {
            tokio::time::sleep(config.request_delay()).await;
        }
    }

    stats.elapsed = start.elapsed();
    Ok(stats)
}
