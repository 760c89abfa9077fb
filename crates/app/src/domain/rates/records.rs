//! Exchange Rate Records

use jiff::Timestamp;
use rust_decimal::Decimal;
use vitrine::rates::{ExchangeRates, RateError, find_currency};

/// Exchange Rate Record
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRateRecord {
    /// ISO-4217 code of the quoted currency
    pub currency: String,

    /// Units of the quoted currency per unit of the base currency
    pub rate: Decimal,

    pub updated_at: Timestamp,
}

/// The store's base currency and every known rate against it.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    pub base_currency: String,
    pub rates: Vec<ExchangeRateRecord>,
}

impl RateTable {
    /// Build a converter from the table.
    ///
    /// A row quoting the base currency against itself is skipped.
    ///
    /// # Errors
    ///
    /// Returns an error when a stored code is not an ISO-4217 currency or a rate is not positive.
    pub fn exchange_rates(&self) -> Result<ExchangeRates<'static>, RateError> {
        let base = find_currency(&self.base_currency)?;
        let mut rates = ExchangeRates::new(base);

        for record in &self.rates {
            let currency = find_currency(&record.currency)?;

            if currency == base {
                continue;
            }

            rates.insert(currency, record.rate)?;
        }

        Ok(rates)
    }
}
