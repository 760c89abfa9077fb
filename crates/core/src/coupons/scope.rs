//! Coupon Scopes
//!
//! Which cart lines a coupon rule reaches.

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use uuid::Uuid;

use crate::{
    cart::{Cart, CartError, CartLine},
    discounts::{DiscountError, minor_in},
};

/// Line indices selected from a cart.
pub type LineIndices = SmallVec<[usize; 8]>;

/// The subset of cart lines a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every line.
    Global,

    /// Lines whose product belongs to the category.
    Category(Uuid),

    /// Lines for the product.
    Product(Uuid),
}

impl Scope {
    /// Whether the line falls within this scope.
    pub fn matches(&self, line: &CartLine<'_>) -> bool {
        match self {
            Self::Global => true,
            Self::Category(category) => line.category == *category,
            Self::Product(product) => line.product == *product,
        }
    }
}

/// A scope plus optional thresholds the matched lines must reach.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeRule<'a> {
    /// Lines the rule reaches
    pub scope: Scope,

    /// Minimum number of matched units
    pub min_quantity: Option<u32>,

    /// Minimum subtotal of matched lines
    pub min_subtotal: Option<Money<'a, Currency>>,
}

impl<'a> ScopeRule<'a> {
    /// A rule with no thresholds.
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            min_quantity: None,
            min_subtotal: None,
        }
    }

    /// A rule covering every line.
    pub fn global() -> Self {
        Self::new(Scope::Global)
    }

    /// Require at least `quantity` matched units.
    #[must_use]
    pub fn with_min_quantity(mut self, quantity: u32) -> Self {
        self.min_quantity = Some(quantity);
        self
    }

    /// Require the matched lines to total at least `subtotal`.
    #[must_use]
    pub fn with_min_subtotal(mut self, subtotal: Money<'a, Currency>) -> Self {
        self.min_subtotal = Some(subtotal);
        self
    }

    /// Indices of the lines this rule makes eligible.
    ///
    /// Empty when the matched lines miss a threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if the minimum subtotal is in another currency, or totalling overflows.
    pub fn eligible_lines(&self, cart: &Cart<'a>) -> Result<LineIndices, DiscountError> {
        let matched: LineIndices = cart
            .lines()
            .iter()
            .enumerate()
            .filter(|(_, line)| self.scope.matches(line))
            .map(|(index, _)| index)
            .collect();

        if let Some(min_quantity) = self.min_quantity {
            let quantity: u64 = matched
                .iter()
                .filter_map(|index| cart.lines().get(*index))
                .map(|line| u64::from(line.quantity))
                .sum();

            if quantity < u64::from(min_quantity) {
                return Ok(LineIndices::new());
            }
        }

        if let Some(min_subtotal) = &self.min_subtotal {
            let minimum = minor_in(min_subtotal, cart.currency())?;

            if cart.subtotal_of(&matched)? < minimum {
                return Ok(LineIndices::new());
            }
        }

        Ok(matched)
    }
}

/// Union of the lines eligible under any of the rules, in cart order.
///
/// # Errors
///
/// Propagates errors from [`ScopeRule::eligible_lines`].
pub fn eligible_union<'a>(
    rules: &[ScopeRule<'a>],
    cart: &Cart<'a>,
) -> Result<LineIndices, DiscountError> {
    let mut eligible = vec![false; cart.lines().len()];

    for rule in rules {
        for index in rule.eligible_lines(cart)? {
            if let Some(flag) = eligible.get_mut(index) {
                *flag = true;
            }
        }
    }

    Ok(eligible
        .into_iter()
        .enumerate()
        .filter_map(|(index, flag)| flag.then_some(index))
        .collect())
}

/// Subtotal of the given lines as money in the cart currency.
///
/// # Errors
///
/// Returns [`CartError::Overflow`] when the sum leaves the `i64` range.
pub fn subtotal_money<'a>(
    cart: &Cart<'a>,
    indices: &[usize],
) -> Result<Money<'a, Currency>, CartError> {
    Ok(Money::from_minor(cart.subtotal_of(indices)?, cart.currency()))
}
