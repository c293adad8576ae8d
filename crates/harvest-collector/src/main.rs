//! Standalone ETL collector CLI.

use clap::{Parser, Subcommand};
use harvest_broker::{BrokerEndpoints, RetryPolicy, StaticTokenProvider, TdApiClient};
use harvest_collector::error::CollectorError;
use harvest_collector::modules::{self, EtlStores};
use harvest_collector::CollectorConfig;
use harvest_core::{logging, WorkKind};
use harvest_data::{
    AuditLogRepository, CandleRepository, Database, DatabaseConfig, FundamentalRepository,
    WorkQueueRepository,
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "harvest-collector")]
#[command(about = "Harvest Market Data Collector", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 작업 큐 적재 (거래량 선별 또는 지정 심볼)
    Enqueue {
        /// 작업 종류 (macros, medium, short, signals)
        #[arg(long)]
        work: WorkKind,

        /// 특정 심볼만 적재 (쉼표로 구분, 예: "AAPL,MSFT")
        #[arg(long)]
        symbols: Option<String>,

        /// 10일 평균 거래량 하한 (미지정 시 설정값 사용)
        #[arg(long)]
        min_avg_volume: Option<i64>,
    },

    /// 큐 처리 (API 호출 → 변환 → 적재 → 큐 제거)
    Process {
        /// 특정 작업 종류만 처리
        #[arg(long)]
        work: Option<WorkKind>,
    },

    /// 큐 상태 조회
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 로깅 초기화 (레벨은 CLI 인자, 형식은 LOG_FORMAT 환경변수)
    let mut log_config = logging::LogConfig::from_env();
    log_config.level = cli.log_level.clone();
    logging::init_logging(log_config)?;

    tracing::info!("Harvest Collector 시작");

    // 설정 로드
    let config = CollectorConfig::from_env()?;
    tracing::debug!(database_url = %config.database_url, "설정 로드 완료");

    // DB 연결 및 마이그레이션
    let db = Database::connect(&DatabaseConfig::with_url(&config.database_url)).await?;
    db.migrate().await?;

    let pool = db.pool().clone();
    let audit = Arc::new(AuditLogRepository::new(pool.clone()));
    let stores = EtlStores {
        fundamentals: Arc::new(FundamentalRepository::new(pool.clone())),
        candles: Arc::new(CandleRepository::new(pool.clone())),
        queue: Arc::new(WorkQueueRepository::new(pool.clone())),
    };

    // 명령 실행
    match cli.command {
        Commands::Enqueue {
            work,
            symbols,
            min_avg_volume,
        } => {
            let min = min_avg_volume.unwrap_or(config.enqueue.min_avg_volume);
            let queued = modules::enqueue_work(&stores, work, symbols, min).await?;
            tracing::info!(work = %work, queued, "큐 적재 종료");
        }
        Commands::Process { work } => {
            let broker = &config.broker;
            if broker.api_key.is_empty() {
                return Err(CollectorError::Config(
                    "TD_API_KEY 환경변수가 설정되지 않았습니다".to_string(),
                )
                .into());
            }
            if broker.access_token.is_empty() {
                return Err(CollectorError::Config(
                    "TD_ACCESS_TOKEN 환경변수가 설정되지 않았습니다".to_string(),
                )
                .into());
            }

            let token = Arc::new(StaticTokenProvider::new(broker.access_token.clone()));
            let client = TdApiClient::new(
                BrokerEndpoints::new(&broker.base_url),
                broker.api_key.clone(),
                broker.timeout_secs,
                token,
                audit,
            )
            .map_err(CollectorError::Broker)?
            .with_policy(RetryPolicy {
                max_attempts: broker.max_attempts,
                ..RetryPolicy::default()
            });

            let stats = modules::process_queue(&client, &stores, &config.process, work).await?;
            stats.log_summary("큐 처리");
        }
        Commands::Status => {
            let counts = stores.queue.pending_counts().await?;
            if counts.is_empty() {
                tracing::info!("대기 중인 작업이 없습니다");
            }
            for (kind, count) in counts {
                tracing::info!(work = %kind, pending = count, "큐 상태");
            }
        }
    }

    pool.close().await;
    tracing::info!("Harvest Collector 종료");

    Ok(())
}
