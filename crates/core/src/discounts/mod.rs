//! Discount utilities
//!
//! Arithmetic shared by every coupon type: percentages of minor unit amounts,
//! checked sums, and currency agreement between coupon amounts and carts.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::cart::CartError;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Summing discounted amounts overflowed.
    #[error("discount arithmetic overflowed")]
    Overflow,

    /// A coupon amount is in a different currency from the cart.
    #[error("coupon amount in {found} cannot apply to a cart in {expected}")]
    CurrencyMismatch {
        /// Cart currency code.
        expected: &'static str,

        /// Coupon amount currency code.
        found: &'static str,
    },

    /// Errors bubbled up from cart totalling.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// Rounds half away from zero, which is round-half-up for the non-negative amounts
/// discounts are taken from.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows or cannot be
/// safely represented.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage does not expose the inner Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Build a percentage from basis points (`2_500` is 25%).
pub fn percentage_from_basis_points(basis_points: u16) -> Percentage {
    Percentage::from(Decimal::new(i64::from(basis_points), 4))
}

/// Minor units of `amount`, provided it is in `currency`.
///
/// # Errors
///
/// Returns [`DiscountError::CurrencyMismatch`] when the currencies differ.
pub fn minor_in(amount: &Money<'_, Currency>, currency: &Currency) -> Result<i64, DiscountError> {
    if amount.currency() != currency {
        return Err(DiscountError::CurrencyMismatch {
            expected: currency.iso_alpha_code,
            found: amount.currency().iso_alpha_code,
        });
    }

    Ok(amount.to_minor_units())
}
