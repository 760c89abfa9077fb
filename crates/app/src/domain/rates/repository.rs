//! Rates Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::domain::rates::records::ExchangeRateRecord;

const GET_BASE_CURRENCY_SQL: &str = include_str!("sql/get_base_currency.sql");
const LIST_EXCHANGE_RATES_SQL: &str = include_str!("sql/list_exchange_rates.sql");
const SET_BASE_CURRENCY_SQL: &str = include_str!("sql/set_base_currency.sql");
const UPSERT_EXCHANGE_RATE_SQL: &str = include_str!("sql/upsert_exchange_rate.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgRatesRepository;

impl PgRatesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_base_currency(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<String, sqlx::Error> {
        query_scalar::<Postgres, String>(GET_BASE_CURRENCY_SQL)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_exchange_rates(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<ExchangeRateRecord>, sqlx::Error> {
        query_as::<Postgres, ExchangeRateRecord>(LIST_EXCHANGE_RATES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn set_base_currency(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        currency: &str,
    ) -> Result<(), sqlx::Error> {
        query(SET_BASE_CURRENCY_SQL)
            .bind(currency)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn upsert_exchange_rate(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        currency: &str,
        rate: Decimal,
    ) -> Result<ExchangeRateRecord, sqlx::Error> {
        query_as::<Postgres, ExchangeRateRecord>(UPSERT_EXCHANGE_RATE_SQL)
            .bind(currency)
            .bind(rate)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ExchangeRateRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            currency: row.try_get::<String, _>("currency")?.trim().to_string(),
            rate: row.try_get("rate")?,
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
