//! Buy-Get Rules
//!
//! "Buy N get M free" rules. Eligible units are grouped by category or product and
//! ordered from cheapest to dearest; each complete block of `buy + get` consecutive
//! units frees its `get` cheapest units. Units that do not complete a block are
//! never discounted.

use std::{collections::BTreeMap, num::NonZeroU32};

use smallvec::SmallVec;
use uuid::Uuid;

use crate::{
    cart::Cart,
    coupons::scope::{LineIndices, ScopeRule},
    discounts::DiscountError,
};

/// How eligible lines are grouped before blocks are formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuyGetTarget {
    /// Units of any product in the same category share blocks.
    SameCategory,

    /// Only units of the same product share blocks.
    SameProduct,
}

/// Units freed on a single cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeUnits {
    /// Cart line index
    pub line: usize,

    /// Number of units made free
    pub units: u64,

    /// Value of the freed units in minor units
    pub amount: i64,
}

/// Outcome of applying one buy-get rule to a cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuyGetOutcome {
    /// Lines the rule's scope made eligible
    pub eligible_lines: LineIndices,

    /// Units freed, per line
    pub free_units: SmallVec<[FreeUnits; 4]>,

    /// Total value of freed units in minor units
    pub discount: i64,
}

/// A buy-get rule.
#[derive(Debug, Clone, PartialEq)]
pub struct BuyGetRule<'a> {
    /// Lines the rule reaches
    pub scope: ScopeRule<'a>,

    /// Units that must be bought per block
    pub buy: NonZeroU32,

    /// Units freed per block
    pub get: NonZeroU32,

    /// Grouping of eligible lines
    pub target: BuyGetTarget,
}

#[derive(Debug, Clone, Copy)]
struct UnitRun {
    price: i64,
    line: usize,
    quantity: u64,
}

impl<'a> BuyGetRule<'a> {
    /// Create a buy-get rule.
    pub fn new(
        scope: ScopeRule<'a>,
        buy: NonZeroU32,
        get: NonZeroU32,
        target: BuyGetTarget,
    ) -> Self {
        Self {
            scope,
            buy,
            get,
            target,
        }
    }

    /// Apply the rule to a cart.
    ///
    /// Quantities are never expanded into individual units; free units are counted
    /// arithmetically per run of identically priced units.
    ///
    /// # Errors
    ///
    /// Returns an error if scope thresholds cannot be evaluated or arithmetic overflows.
    pub fn apply(&self, cart: &Cart<'a>) -> Result<BuyGetOutcome, DiscountError> {
        let eligible_lines = self.scope.eligible_lines(cart)?;

        let mut groups: BTreeMap<Uuid, SmallVec<[UnitRun; 4]>> = BTreeMap::new();

        for &index in &eligible_lines {
            let Some(line) = cart.lines().get(index) else {
                continue;
            };

            let key = match self.target {
                BuyGetTarget::SameCategory => line.category,
                BuyGetTarget::SameProduct => line.product,
            };

            groups.entry(key).or_default().push(UnitRun {
                price: line.unit_price.to_minor_units(),
                line: index,
                quantity: u64::from(line.quantity),
            });
        }

        let block = u64::from(self.buy.get()) + u64::from(self.get.get());
        let get = u64::from(self.get.get());

        let mut free_units = SmallVec::new();
        let mut discount = 0_i64;

        for runs in groups.values_mut() {
            runs.sort_by_key(|run| (run.price, run.line));

            let total = runs
                .iter()
                .try_fold(0_u64, |acc, run| acc.checked_add(run.quantity))
                .ok_or(DiscountError::Overflow)?;

            let limit = (total / block) * block;
            let mut start = 0_u64;

            for run in runs.iter() {
                let end = start + run.quantity;

                let units = freed_before(end.min(limit), block, get)
                    - freed_before(start.min(limit), block, get);

                if units > 0 {
                    let amount = i64::try_from(units)
                        .ok()
                        .and_then(|units| run.price.checked_mul(units))
                        .ok_or(DiscountError::Overflow)?;

                    discount = discount
                        .checked_add(amount)
                        .ok_or(DiscountError::Overflow)?;

                    free_units.push(FreeUnits {
                        line: run.line,
                        units,
                        amount,
                    });
                }

                start = end;
            }
        }

        Ok(BuyGetOutcome {
            eligible_lines,
            free_units,
            discount,
        })
    }
}

/// Number of free positions among the first `position` units of a sorted group.
fn freed_before(position: u64, block: u64, get: u64) -> u64 {
    (position / block) * get + (position % block).min(get)
}
