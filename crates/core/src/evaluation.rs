//! Evaluation
//!
//! Computes the discount a coupon grants on a cart.

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::{
    cart::Cart,
    coupons::{BuyGetOutcome, CouponTerms, FreeUnits, LineIndices, scope::eligible_union},
    discounts::{DiscountError, minor_in, percent_of_minor},
};

/// The discount a coupon grants on a cart, with its breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<'a> {
    /// Discount granted, never negative and never above the eligible subtotal
    pub discount: Money<'a, Currency>,

    /// Subtotal of the eligible lines
    pub eligible_subtotal: Money<'a, Currency>,

    /// Indices of the eligible lines, in cart order
    pub eligible_lines: LineIndices,

    /// Units made free by a buy-get rule
    pub free_units: SmallVec<[FreeUnits; 4]>,

    /// Whether a maximum discount reduced the result
    pub capped: bool,
}

impl Evaluation<'_> {
    /// Whether the coupon took anything off.
    pub fn is_zero(&self) -> bool {
        self.discount.to_minor_units() == 0
    }
}

/// Evaluate coupon terms against a cart.
///
/// Pure: the same terms and cart always yield the same evaluation.
///
/// # Errors
///
/// - [`DiscountError::CurrencyMismatch`]: a coupon amount is not in the cart currency.
/// - [`DiscountError::Overflow`] / [`DiscountError::PercentConversion`]: arithmetic left the
///   representable range.
pub fn evaluate<'a>(
    terms: &CouponTerms<'a>,
    cart: &Cart<'a>,
) -> Result<Evaluation<'a>, DiscountError> {
    let currency = cart.currency();

    match terms {
        CouponTerms::AmountOff { amount, rules } => {
            let eligible_lines = eligible_union(rules, cart)?;
            let subtotal = cart.subtotal_of(&eligible_lines)?;
            let amount = minor_in(amount, currency)?;

            let discount = amount.min(subtotal).max(0);

            Ok(Evaluation {
                discount: Money::from_minor(discount, currency),
                eligible_subtotal: Money::from_minor(subtotal, currency),
                eligible_lines,
                free_units: SmallVec::new(),
                capped: false,
            })
        }
        CouponTerms::PercentageOff {
            percentage,
            max_discount,
            rules,
        } => {
            let eligible_lines = eligible_union(rules, cart)?;
            let subtotal = cart.subtotal_of(&eligible_lines)?;

            let mut discount = percent_of_minor(percentage, subtotal)?;
            let mut capped = false;

            if let Some(max_discount) = max_discount {
                let max_discount = minor_in(max_discount, currency)?;

                if discount > max_discount {
                    discount = max_discount;
                    capped = true;
                }
            }

            Ok(Evaluation {
                discount: Money::from_minor(discount.clamp(0, subtotal.max(0)), currency),
                eligible_subtotal: Money::from_minor(subtotal, currency),
                eligible_lines,
                free_units: SmallVec::new(),
                capped,
            })
        }
        CouponTerms::BuyGet { rules } => {
            let mut best = BuyGetOutcome::default();

            for rule in rules {
                let outcome = rule.apply(cart)?;

                if outcome.discount > best.discount || best.eligible_lines.is_empty() {
                    best = outcome;
                }
            }

            let subtotal = cart.subtotal_of(&best.eligible_lines)?;

            Ok(Evaluation {
                discount: Money::from_minor(best.discount.clamp(0, subtotal.max(0)), currency),
                eligible_subtotal: Money::from_minor(subtotal, currency),
                eligible_lines: best.eligible_lines,
                free_units: best.free_units,
                capped: false,
            })
        }
    }
}
