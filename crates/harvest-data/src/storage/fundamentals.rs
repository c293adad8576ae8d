//! 펀더멘털 repository.

use super::db_err;
use async_trait::async_trait;
use harvest_core::{FundamentalStore, HarvestResult, InstrumentProfile};
use rust_decimal::Decimal;
use sqlx::postgres::PgPool;
use tracing::debug;

/// `fundamentals` 테이블 repository.
///
/// 성공한 Macros 수집마다 레코드가 통째로 대체됩니다. 시가총액 미달
/// 종목은 시가총액 컬럼만 갱신하는 축약 upsert를 사용합니다.
#[derive(Clone)]
pub struct FundamentalRepository {
    pool: PgPool,
}

impl FundamentalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FundamentalStore for FundamentalRepository {
    async fn upsert_profile(
        &self,
        symbol: &str,
        profile: &InstrumentProfile,
    ) -> HarvestResult<()> {
        let f = &profile.fundamental;
        sqlx::query(
            r#"
            INSERT INTO fundamentals (
                symbol, cusip, description, exchange, asset_type,
                high52, low52, dividend_amount, dividend_yield, dividend_date,
                pe_ratio, peg_ratio, pb_ratio, pr_ratio, pcf_ratio,
                gross_margin_ttm, gross_margin_mrq,
                net_profit_margin_ttm, net_profit_margin_mrq,
                operating_margin_ttm, operating_margin_mrq,
                return_on_equity, return_on_assets, return_on_investment,
                quick_ratio, current_ratio, interest_coverage,
                total_debt_to_capital, lt_debt_to_equity, total_debt_to_equity,
                eps_ttm, eps_change_percent_ttm, eps_change_year, eps_change,
                rev_change_year, rev_change_ttm, rev_change_in,
                shares_outstanding, market_cap_float, market_cap,
                book_value_per_share, short_int_to_float, short_int_day_to_cover,
                div_growth_rate_3_year, dividend_pay_amount, dividend_pay_date,
                beta, vol1_day_avg, vol10_day_avg, vol3_month_avg,
                fetched_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15,
                $16, $17, $18, $19, $20, $21,
                $22, $23, $24, $25, $26, $27,
                $28, $29, $30, $31, $32, $33, $34,
                $35, $36, $37, $38, $39, $40,
                $41, $42, $43, $44, $45, $46,
                $47, $48, $49, $50,
                NOW(), NOW()
            )
            ON CONFLICT (symbol)
            DO UPDATE SET
                cusip = EXCLUDED.cusip,
                description = EXCLUDED.description,
                exchange = EXCLUDED.exchange,
                asset_type = EXCLUDED.asset_type,
                high52 = EXCLUDED.high52,
                low52 = EXCLUDED.low52,
                dividend_amount = EXCLUDED.dividend_amount,
                dividend_yield = EXCLUDED.dividend_yield,
                dividend_date = EXCLUDED.dividend_date,
                pe_ratio = EXCLUDED.pe_ratio,
                peg_ratio = EXCLUDED.peg_ratio,
                pb_ratio = EXCLUDED.pb_ratio,
                pr_ratio = EXCLUDED.pr_ratio,
                pcf_ratio = EXCLUDED.pcf_ratio,
                gross_margin_ttm = EXCLUDED.gross_margin_ttm,
                gross_margin_mrq = EXCLUDED.gross_margin_mrq,
                net_profit_margin_ttm = EXCLUDED.net_profit_margin_ttm,
                net_profit_margin_mrq = EXCLUDED.net_profit_margin_mrq,
                operating_margin_ttm = EXCLUDED.operating_margin_ttm,
                operating_margin_mrq = EXCLUDED.operating_margin_mrq,
                return_on_equity = EXCLUDED.return_on_equity,
                return_on_assets = EXCLUDED.return_on_assets,
                return_on_investment = EXCLUDED.return_on_investment,
                quick_ratio = EXCLUDED.quick_ratio,
                current_ratio = EXCLUDED.current_ratio,
                interest_coverage = EXCLUDED.interest_coverage,
                total_debt_to_capital = EXCLUDED.total_debt_to_capital,
                lt_debt_to_equity = EXCLUDED.lt_debt_to_equity,
                total_debt_to_equity = EXCLUDED.total_debt_to_equity,
                eps_ttm = EXCLUDED.eps_ttm,
                eps_change_percent_ttm = EXCLUDED.eps_change_percent_ttm,
                eps_change_year = EXCLUDED.eps_change_year,
                eps_change = EXCLUDED.eps_change,
                rev_change_year = EXCLUDED.rev_change_year,
                rev_change_ttm = EXCLUDED.rev_change_ttm,
                rev_change_in = EXCLUDED.rev_change_in,
                shares_outstanding = EXCLUDED.shares_outstanding,
                market_cap_float = EXCLUDED.market_cap_float,
                market_cap = EXCLUDED.market_cap,
                book_value_per_share = EXCLUDED.book_value_per_share,
                short_int_to_float = EXCLUDED.short_int_to_float,
                short_int_day_to_cover = EXCLUDED.short_int_day_to_cover,
                div_growth_rate_3_year = EXCLUDED.div_growth_rate_3_year,
                dividend_pay_amount = EXCLUDED.dividend_pay_amount,
                dividend_pay_date = EXCLUDED.dividend_pay_date,
                beta = EXCLUDED.beta,
                vol1_day_avg = EXCLUDED.vol1_day_avg,
                vol10_day_avg = EXCLUDED.vol10_day_avg,
                vol3_month_avg = EXCLUDED.vol3_month_avg,
                fetched_at = NOW(),
                updated_at = NOW()
            "#,
        )
        .bind(symbol)
        .bind(&profile.cusip)
        .bind(&profile.description)
        .bind(&profile.exchange)
        .bind(&profile.asset_type)
        .bind(f.high52)
        .bind(f.low52)
        .bind(f.dividend_amount)
        .bind(f.dividend_yield)
        .bind(&f.dividend_date)
        .bind(f.pe_ratio)
        .bind(f.peg_ratio)
        .bind(f.pb_ratio)
        .bind(f.pr_ratio)
        .bind(f.pcf_ratio)
        .bind(f.gross_margin_ttm)
        .bind(f.gross_margin_mrq)
        .bind(f.net_profit_margin_ttm)
        .bind(f.net_profit_margin_mrq)
        .bind(f.operating_margin_ttm)
        .bind(f.operating_margin_mrq)
        .bind(f.return_on_equity)
        .bind(f.return_on_assets)
        .bind(f.return_on_investment)
        .bind(f.quick_ratio)
        .bind(f.current_ratio)
        .bind(f.interest_coverage)
        .bind(f.total_debt_to_capital)
        .bind(f.lt_debt_to_equity)
        .bind(f.total_debt_to_equity)
        .bind(f.eps_ttm)
        .bind(f.eps_change_percent_ttm)
        .bind(f.eps_change_year)
        .bind(f.eps_change)
        .bind(f.rev_change_year)
        .bind(f.rev_change_ttm)
        .bind(f.rev_change_in)
        .bind(f.shares_outstanding)
        .bind(f.market_cap_float)
        .bind(f.market_cap)
        .bind(f.book_value_per_share)
        .bind(f.short_int_to_float)
        .bind(f.short_int_day_to_cover)
        .bind(f.div_growth_rate_3_year)
        .bind(f.dividend_pay_amount)
        .bind(&f.dividend_pay_date)
        .bind(f.beta)
        .bind(f.vol1_day_avg)
        .bind(f.vol10_day_avg)
        .bind(f.vol3_month_avg)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        debug!(symbol = symbol, "펀더멘털 전체 upsert 완료");
        Ok(())
    }

    async fn upsert_market_cap(&self, symbol: &str, market_cap: Decimal) -> HarvestResult<()> {
        sqlx::query(
            r#"
            INSERT INTO fundamentals (symbol, market_cap, fetched_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            ON CONFLICT (symbol)
            DO UPDATE SET
                market_cap = EXCLUDED.market_cap,
                fetched_at = NOW(),
                updated_at = NOW()
            "#,
        )
        .bind(symbol)
        .bind(market_cap)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        debug!(symbol = symbol, "시가총액 축약 upsert 완료");
        Ok(())
    }

    async fn symbols_over_avg_volume(
        &self,
        min_avg_volume: Decimal,
    ) -> HarvestResult<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT symbol
            FROM fundamentals
            WHERE vol10_day_avg > $1
            ORDER BY symbol
            "#,
        )
        .bind(min_avg_volume)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(|(s,)| s).collect())
    }
}
