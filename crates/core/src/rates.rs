//! Exchange Rates
//!
//! Converts money between the store's base currency and the currencies it sells in.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{Findable, Money, iso::Currency};
use thiserror::Error;

/// Errors raised while converting money between currencies.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateError {
    /// The currency code is not an ISO-4217 code.
    #[error("unknown currency code {0}")]
    UnknownCurrency(String),

    /// No rate is known for the currency.
    #[error("no exchange rate for {0}")]
    MissingRate(&'static str),

    /// A rate was zero or negative.
    #[error("exchange rate for {0} must be positive")]
    InvalidRate(&'static str),

    /// The converted amount does not fit in minor units.
    #[error("currency conversion overflowed")]
    Overflow,
}

/// Look up an ISO-4217 currency by its alphabetic code, ignoring case.
///
/// # Errors
///
/// Returns [`RateError::UnknownCurrency`] when the code is not recognised.
pub fn find_currency(code: &str) -> Result<&'static Currency, RateError> {
    Currency::find(&code.trim().to_ascii_uppercase())
        .ok_or_else(|| RateError::UnknownCurrency(code.to_string()))
}

/// Convert a major unit decimal (`"12.50"`) into minor units of the currency.
///
/// Rounds half away from zero at the currency's exponent.
///
/// # Errors
///
/// Returns [`RateError::Overflow`] when the result does not fit in an `i64`.
pub fn major_to_minor(amount: Decimal, currency: &Currency) -> Result<i64, RateError> {
    let scale = Decimal::from(10_i64.pow(currency.exponent));

    amount
        .checked_mul(scale)
        .ok_or(RateError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(RateError::Overflow)
}

/// Exchange rates relative to a base currency.
///
/// A rate converts one unit of the base currency into the quoted currency.
#[derive(Debug, Clone)]
pub struct ExchangeRates<'a> {
    base: &'a Currency,
    rates: FxHashMap<&'a str, (&'a Currency, Decimal)>,
}

impl<'a> ExchangeRates<'a> {
    /// Create an empty rate table for the base currency.
    pub fn new(base: &'a Currency) -> Self {
        Self {
            base,
            rates: FxHashMap::default(),
        }
    }

    /// Add a rate, returning the table.
    ///
    /// # Errors
    ///
    /// Returns [`RateError::InvalidRate`] for a rate that is not positive.
    pub fn with_rate(mut self, currency: &'a Currency, rate: Decimal) -> Result<Self, RateError> {
        self.insert(currency, rate)?;

        Ok(self)
    }

    /// Add or replace a rate.
    ///
    /// # Errors
    ///
    /// Returns [`RateError::InvalidRate`] for a rate that is not positive.
    pub fn insert(&mut self, currency: &'a Currency, rate: Decimal) -> Result<(), RateError> {
        if rate <= Decimal::ZERO {
            return Err(RateError::InvalidRate(currency.iso_alpha_code));
        }

        self.rates.insert(currency.iso_alpha_code, (currency, rate));

        Ok(())
    }

    /// Base currency
    pub fn base(&self) -> &'a Currency {
        self.base
    }

    /// Rate from the base currency into `currency`. The base itself is always `1`.
    ///
    /// # Errors
    ///
    /// Returns [`RateError::MissingRate`] when no rate is known.
    pub fn rate(&self, currency: &Currency) -> Result<Decimal, RateError> {
        if currency == self.base {
            return Ok(Decimal::ONE);
        }

        self.rates
            .get(currency.iso_alpha_code)
            .map(|(_, rate)| *rate)
            .ok_or(RateError::MissingRate(currency.iso_alpha_code))
    }

    /// Known currencies other than the base, sorted by code.
    pub fn quoted(&self) -> Vec<(&'a Currency, Decimal)> {
        let mut quoted: Vec<_> = self.rates.values().copied().collect();

        quoted.sort_by_key(|(currency, _)| currency.iso_alpha_code);

        quoted
    }

    /// Convert money into the target currency.
    ///
    /// Base to target multiplies by the target's rate, target to base divides by the source's
    /// rate, and any other pair goes through the base. The result is rounded half away from zero
    /// to the target's minor unit.
    ///
    /// # Errors
    ///
    /// Returns an error when either currency has no rate, or the result overflows.
    pub fn convert(
        &self,
        money: &Money<'a, Currency>,
        target: &'a Currency,
    ) -> Result<Money<'a, Currency>, RateError> {
        let source = money.currency();

        if source == target {
            return Ok(money.clone());
        }

        let source_rate = self.rate(source)?;
        let target_rate = self.rate(target)?;

        let major = Decimal::new(money.to_minor_units(), source.exponent);

        let converted = major
            .checked_div(source_rate)
            .and_then(|base| base.checked_mul(target_rate))
            .ok_or(RateError::Overflow)?;

        Ok(Money::from_minor(major_to_minor(converted, target)?, target))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{EUR, GBP, JPY, USD};
    use testresult::TestResult;

    use super::*;

    fn rates() -> Result<ExchangeRates<'static>, RateError> {
        ExchangeRates::new(USD)
            .with_rate(EUR, Decimal::new(92, 2))?
            .with_rate(JPY, Decimal::new(150, 0))
    }

    #[test]
    fn base_to_target_multiplies() -> TestResult {
        let converted = rates()?.convert(&Money::from_minor(1_000, USD), EUR)?;

        assert_eq!(converted, Money::from_minor(920, EUR));

        Ok(())
    }

    #[test]
    fn target_to_base_divides() -> TestResult {
        let converted = rates()?.convert(&Money::from_minor(920, EUR), USD)?;

        assert_eq!(converted, Money::from_minor(1_000, USD));

        Ok(())
    }

    #[test]
    fn cross_rates_go_through_base() -> TestResult {
        // 9.20 EUR is 10 USD is 1500 JPY
        let converted = rates()?.convert(&Money::from_minor(920, EUR), JPY)?;

        assert_eq!(converted, Money::from_minor(1_500, JPY));

        Ok(())
    }

    #[test]
    fn unknown_rate_is_an_error() -> TestResult {
        let result = rates()?.convert(&Money::from_minor(100, USD), GBP);

        assert_eq!(result, Err(RateError::MissingRate("GBP")));

        Ok(())
    }

    #[test]
    fn non_positive_rates_are_rejected() {
        let result = ExchangeRates::new(USD).with_rate(EUR, Decimal::ZERO);

        assert!(matches!(result, Err(RateError::InvalidRate("EUR"))));
    }

    #[test]
    fn major_to_minor_respects_exponent() -> TestResult {
        assert_eq!(major_to_minor(Decimal::new(1_2345, 3), USD)?, 1_235);
        assert_eq!(major_to_minor(Decimal::new(1_5, 1), JPY)?, 2);

        Ok(())
    }

    #[test]
    fn find_currency_normalises_case() -> TestResult {
        assert_eq!(find_currency(" eur ")?, EUR);
        assert!(find_currency("XXQ").is_err());

        Ok(())
    }
}
