//! Coupon terms
//!
//! Turns stored coupons and submitted carts into the engine's types. Coupon amounts are
//! stored in the base currency and converted into the cart currency here, so evaluation never
//! sees two currencies.

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use vitrine::{
    cart::{Cart, CartLine},
    coupons::{BuyGetRule, CouponTerms, ScopeRule},
    discounts::percentage_from_basis_points,
    rates::{ExchangeRates, find_currency},
};

use crate::domain::coupons::{
    data::CartInput,
    errors::CouponsServiceError,
    records::{CouponDiscount, CouponRecord, CouponRuleRecord},
};

/// Build a cart from submitted lines.
///
/// # Errors
///
/// Returns an error for an unknown currency, a negative price, or totals that overflow.
pub fn cart_from_input(input: &CartInput) -> Result<Cart<'static>, CouponsServiceError> {
    let currency = find_currency(&input.currency)?;

    let lines = input.items.iter().map(|item| {
        CartLine::new(
            item.product_uuid,
            item.category_uuid,
            Money::from_minor(item.unit_price, currency),
            item.quantity,
        )
    });

    Ok(Cart::with_lines(lines, currency)?)
}

/// Engine terms for a coupon, with base currency amounts converted into `currency`.
///
/// # Errors
///
/// - [`CouponsServiceError::InvalidData`]: a stored amount is out of range, or a BOGO coupon
///   has a rule without buy-get terms.
/// - [`CouponsServiceError::Rates`]: no exchange rate into `currency`.
pub fn coupon_terms<'a>(
    coupon: &CouponRecord,
    rates: &ExchangeRates<'a>,
    currency: &'a Currency,
) -> Result<CouponTerms<'a>, CouponsServiceError> {
    let convert = |minor: u64| -> Result<Money<'a, Currency>, CouponsServiceError> {
        let minor = i64::try_from(minor).map_err(|_overflow| CouponsServiceError::InvalidData)?;

        Ok(rates.convert(&Money::from_minor(minor, rates.base()), currency)?)
    };

    let scope_rule = |rule: &CouponRuleRecord| -> Result<ScopeRule<'a>, CouponsServiceError> {
        let mut scope_rule = ScopeRule::new(rule.scope);

        if let Some(min_quantity) = rule.min_quantity {
            scope_rule = scope_rule.with_min_quantity(min_quantity);
        }

        if let Some(min_subtotal) = rule.min_subtotal {
            scope_rule = scope_rule.with_min_subtotal(convert(min_subtotal)?);
        }

        Ok(scope_rule)
    };

    let scope_rules = || -> Result<SmallVec<[ScopeRule<'a>; 2]>, CouponsServiceError> {
        coupon.rules.iter().map(&scope_rule).collect()
    };

    match coupon.discount {
        CouponDiscount::Amount { amount_fixed } => Ok(CouponTerms::AmountOff {
            amount: convert(amount_fixed)?,
            rules: scope_rules()?,
        }),
        CouponDiscount::Percent {
            basis_points,
            max_discount,
        } => Ok(CouponTerms::PercentageOff {
            percentage: percentage_from_basis_points(basis_points),
            max_discount: max_discount.map(&convert).transpose()?,
            rules: scope_rules()?,
        }),
        CouponDiscount::BuyGet => {
            let rules = coupon
                .rules
                .iter()
                .map(|rule| {
                    let terms = rule.buy_get.ok_or(CouponsServiceError::InvalidData)?;

                    Ok(BuyGetRule::new(
                        scope_rule(rule)?,
                        terms.buy,
                        terms.get,
                        terms.target,
                    ))
                })
                .collect::<Result<_, CouponsServiceError>>()?;

            Ok(CouponTerms::BuyGet { rules })
        }
    }
}
