//! Rates service.

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use tracing::info;
use vitrine::rates::find_currency;

use crate::{
    database::Db,
    domain::rates::{
        errors::RatesServiceError,
        records::{ExchangeRateRecord, RateTable},
        repository::PgRatesRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgRatesService {
    db: Db,
    repository: PgRatesRepository,
}

impl PgRatesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgRatesRepository::new(),
        }
    }
}

#[async_trait]
impl RatesService for PgRatesService {
    async fn get_rates(&self) -> Result<RateTable, RatesServiceError> {
        let mut tx = self.db.begin().await?;

        let base_currency = self.repository.get_base_currency(&mut tx).await?;
        let rates = self.repository.list_exchange_rates(&mut tx).await?;

        tx.commit().await?;

        Ok(RateTable {
            base_currency: base_currency.trim().to_string(),
            rates,
        })
    }

    #[tracing::instrument(name = "rates.service.set_base_currency", skip(self), err)]
    async fn set_base_currency(&self, currency: &str) -> Result<(), RatesServiceError> {
        let currency = find_currency(currency)?;

        let mut tx = self.db.begin().await?;

        self.repository
            .set_base_currency(&mut tx, currency.iso_alpha_code)
            .await?;

        tx.commit().await?;

        info!(base_currency = currency.iso_alpha_code, "set base currency");

        Ok(())
    }

    #[tracing::instrument(name = "rates.service.set_rate", skip(self), fields(rate = %rate), err)]
    async fn set_rate(
        &self,
        currency: &str,
        rate: Decimal,
    ) -> Result<ExchangeRateRecord, RatesServiceError> {
        let currency = find_currency(currency)?;

        if rate <= Decimal::ZERO {
            return Err(RatesServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        let record = self
            .repository
            .upsert_exchange_rate(&mut tx, currency.iso_alpha_code, rate)
            .await?;

        tx.commit().await?;

        Ok(record)
    }
}

#[automock]
#[async_trait]
pub trait RatesService: Send + Sync {
    /// The base currency and every stored exchange rate, ordered by currency code.
    async fn get_rates(&self) -> Result<RateTable, RatesServiceError>;

    /// Change the currency coupon amounts and rates are expressed in.
    async fn set_base_currency(&self, currency: &str) -> Result<(), RatesServiceError>;

    /// Insert or replace the rate from the base currency into `currency`.
    async fn set_rate(
        &self,
        currency: &str,
        rate: Decimal,
    ) -> Result<ExchangeRateRecord, RatesServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use vitrine::rates::RateError;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn get_rates_returns_seeded_base_currency() -> TestResult {
        let ctx = TestContext::new().await;

        let table = ctx.rates.get_rates().await?;

        assert_eq!(table.base_currency, "TRY");
        assert!(table.rates.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn set_rate_upserts_and_orders_by_code() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.rates.set_rate("usd", Decimal::new(30, 3)).await?;
        ctx.rates.set_rate("EUR", Decimal::new(28, 3)).await?;
        ctx.rates.set_rate("USD", Decimal::new(25, 3)).await?;

        let table = ctx.rates.get_rates().await?;

        let codes: Vec<_> = table.rates.iter().map(|r| r.currency.as_str()).collect();

        assert_eq!(codes, ["EUR", "USD"]);
        assert_eq!(table.rates.get(1).map(|r| r.rate), Some(Decimal::new(25, 3)));

        Ok(())
    }

    #[tokio::test]
    async fn set_rate_rejects_unknown_currency() {
        let ctx = TestContext::new().await;

        let result = ctx.rates.set_rate("ZZZ", Decimal::ONE).await;

        assert!(
            matches!(
                result,
                Err(RatesServiceError::Rate(RateError::UnknownCurrency(_)))
            ),
            "expected UnknownCurrency, got {result:?}"
        );
    }

    #[tokio::test]
    async fn set_base_currency_changes_base() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.rates.set_base_currency("usd").await?;

        assert_eq!(ctx.rates.get_rates().await?.base_currency, "USD");

        Ok(())
    }
}
