//! Carts

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while building a cart or totalling its lines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// A line is priced in a different currency from the cart.
    #[error("cart line {index} is priced in {found}, expected {expected}")]
    CurrencyMismatch {
        /// Index of the offending line.
        index: usize,

        /// Cart currency code.
        expected: &'static str,

        /// Line currency code.
        found: &'static str,
    },

    /// A line has a negative unit price.
    #[error("cart line {index} has a negative unit price")]
    NegativePrice {
        /// Index of the offending line.
        index: usize,
    },

    /// Totalling the cart overflowed the minor unit range.
    #[error("cart total overflowed")]
    Overflow,
}

/// A single cart line: one product at one unit price, possibly many units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartLine<'a> {
    /// Product identifier
    pub product: Uuid,

    /// Category identifier of the product
    pub category: Uuid,

    /// Price of one unit
    pub unit_price: Money<'a, Currency>,

    /// Number of units
    pub quantity: u32,
}

impl<'a> CartLine<'a> {
    /// Create a cart line.
    pub fn new(
        product: Uuid,
        category: Uuid,
        unit_price: Money<'a, Currency>,
        quantity: u32,
    ) -> Self {
        Self {
            product,
            category,
            unit_price,
            quantity,
        }
    }

    /// Line total in minor units, `None` on overflow.
    pub fn total_minor(&self) -> Option<i64> {
        self.unit_price
            .to_minor_units()
            .checked_mul(i64::from(self.quantity))
    }
}

/// A transient shopping cart in a single currency.
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    currency: &'a Currency,
    lines: SmallVec<[CartLine<'a>; 8]>,
}

impl<'a> Cart<'a> {
    /// Create an empty cart in the given currency.
    pub fn new(currency: &'a Currency) -> Self {
        Self {
            currency,
            lines: SmallVec::new(),
        }
    }

    /// Create a cart from lines, checking every line against the cart currency.
    ///
    /// # Errors
    ///
    /// - [`CartError::CurrencyMismatch`]: a line is priced in another currency.
    /// - [`CartError::NegativePrice`]: a line has a negative unit price.
    pub fn with_lines<I>(lines: I, currency: &'a Currency) -> Result<Self, CartError>
    where
        I: IntoIterator<Item = CartLine<'a>>,
    {
        let mut cart = Self::new(currency);

        for line in lines {
            cart.push(line)?;
        }

        Ok(cart)
    }

    /// Append a line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line's currency differs from the cart's, or its price is negative.
    pub fn push(&mut self, line: CartLine<'a>) -> Result<(), CartError> {
        let index = self.lines.len();
        let found = line.unit_price.currency();

        if found != self.currency {
            return Err(CartError::CurrencyMismatch {
                index,
                expected: self.currency.iso_alpha_code,
                found: found.iso_alpha_code,
            });
        }

        if line.unit_price.to_minor_units() < 0 {
            return Err(CartError::NegativePrice { index });
        }

        self.lines.push(line);

        Ok(())
    }

    /// Cart currency
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Cart lines, in insertion order
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Whether the cart has no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of the given lines' totals in minor units. Unknown indices are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] if the sum leaves the `i64` range.
    pub fn subtotal_of(&self, indices: &[usize]) -> Result<i64, CartError> {
        indices
            .iter()
            .filter_map(|index| self.lines.get(*index))
            .try_fold(0_i64, |acc, line| {
                line.total_minor()
                    .and_then(|total| acc.checked_add(total))
                    .ok_or(CartError::Overflow)
            })
    }

    /// Subtotal of the whole cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] if the sum leaves the `i64` range.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, CartError> {
        let all: SmallVec<[usize; 8]> = (0..self.lines.len()).collect();

        Ok(Money::from_minor(self.subtotal_of(&all)?, self.currency))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{EUR, USD};
    use testresult::TestResult;

    use super::*;

    fn line(price: i64, quantity: u32) -> CartLine<'static> {
        CartLine::new(
            Uuid::now_v7(),
            Uuid::now_v7(),
            Money::from_minor(price, USD),
            quantity,
        )
    }

    #[test]
    fn subtotal_multiplies_quantities() -> TestResult {
        let cart = Cart::with_lines([line(250, 2), line(100, 3)], USD)?;

        assert_eq!(cart.subtotal()?, Money::from_minor(800, USD));

        Ok(())
    }

    #[test]
    fn rejects_lines_in_another_currency() {
        let foreign = CartLine::new(
            Uuid::now_v7(),
            Uuid::now_v7(),
            Money::from_minor(100, EUR),
            1,
        );

        let result = Cart::with_lines([line(100, 1), foreign], USD);

        assert_eq!(
            result.err(),
            Some(CartError::CurrencyMismatch {
                index: 1,
                expected: "USD",
                found: "EUR",
            })
        );
    }

    #[test]
    fn rejects_negative_prices() {
        let result = Cart::with_lines([line(-1, 1)], USD);

        assert_eq!(result.err(), Some(CartError::NegativePrice { index: 0 }));
    }

    #[test]
    fn subtotal_overflow_is_reported() -> TestResult {
        let cart = Cart::with_lines([line(i64::MAX, 2)], USD)?;

        assert_eq!(cart.subtotal().err(), Some(CartError::Overflow));

        Ok(())
    }
}
