//! Coupons
//!
//! Coupon discount terms: what a coupon takes off, and which cart lines it reaches.

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

pub mod buy_get;
pub mod scope;

pub use buy_get::{BuyGetOutcome, BuyGetRule, BuyGetTarget, FreeUnits};
pub use scope::{LineIndices, Scope, ScopeRule};

/// How a coupon combines with other coupons on the same cart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StackingPolicy {
    /// At most one coupon per cart.
    #[default]
    Exclusive,
}

/// The discount a coupon grants.
#[derive(Debug, Clone, PartialEq)]
pub enum CouponTerms<'a> {
    /// A fixed amount off the eligible subtotal.
    AmountOff {
        /// Amount off, in the cart currency
        amount: Money<'a, Currency>,

        /// Rules selecting eligible lines
        rules: SmallVec<[ScopeRule<'a>; 2]>,
    },

    /// A percentage off the eligible subtotal, optionally capped.
    PercentageOff {
        /// Percentage off
        percentage: Percentage,

        /// Largest discount allowed, in the cart currency
        max_discount: Option<Money<'a, Currency>>,

        /// Rules selecting eligible lines
        rules: SmallVec<[ScopeRule<'a>; 2]>,
    },

    /// Buy some units, get the cheapest ones free.
    BuyGet {
        /// Buy-get rules; the most generous one applies
        rules: SmallVec<[BuyGetRule<'a>; 2]>,
    },
}

impl CouponTerms<'_> {
    /// Stacking policy for these terms.
    pub fn stacking_policy(&self) -> StackingPolicy {
        StackingPolicy::Exclusive
    }

    /// Short name of the discount kind.
    pub fn kind_as_str(&self) -> &'static str {
        match self {
            Self::AmountOff { .. } => "amount",
            Self::PercentageOff { .. } => "percent",
            Self::BuyGet { .. } => "bogo",
        }
    }
}
