//! Coupon Records

use std::num::NonZeroU32;

use jiff::Timestamp;
use uuid::Uuid;
use vitrine::coupons::{BuyGetTarget, Scope};

use crate::{
    domain::{orders::records::OrderUuid, users::UserUuid},
    uuids::TypedUuid,
};

/// Coupon UUID
pub type CouponUuid = TypedUuid<CouponRecord>;

/// Coupon Rule UUID
pub type CouponRuleUuid = TypedUuid<CouponRuleRecord>;

/// Coupon Redemption UUID
pub type CouponRedemptionUuid = TypedUuid<CouponRedemptionRecord>;

/// Lifecycle state of a coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponStatus {
    Active,
    Disabled,
    Expired,
}

impl CouponStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Disabled => "disabled",
            Self::Expired => "expired",
        }
    }
}

impl TryFrom<&str> for CouponStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "disabled" => Ok(Self::Disabled),
            "expired" => Ok(Self::Expired),
            other => Err(format!("unknown coupon status '{other}'")),
        }
    }
}

/// What a coupon takes off. Amounts are minor units of the base currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponDiscount {
    Amount { amount_fixed: u64 },
    Percent {
        basis_points: u16,
        max_discount: Option<u64>,
    },
    BuyGet,
}

impl CouponDiscount {
    pub fn type_as_str(&self) -> &'static str {
        match self {
            Self::Amount { .. } => "amount",
            Self::Percent { .. } => "percent",
            Self::BuyGet => "bogo",
        }
    }
}

/// Buy-get terms carried by a rule of a BOGO coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyGetTerms {
    pub buy: NonZeroU32,
    pub get: NonZeroU32,
    pub target: BuyGetTarget,
}

/// Coupon Rule Record
#[derive(Debug, Clone, PartialEq)]
pub struct CouponRuleRecord {
    pub uuid: CouponRuleUuid,
    pub scope: Scope,
    pub min_quantity: Option<u32>,
    /// Minor units of the base currency
    pub min_subtotal: Option<u64>,
    pub buy_get: Option<BuyGetTerms>,
}

impl CouponRuleRecord {
    /// A rule with no thresholds and no buy-get terms.
    pub fn scoped(scope: Scope) -> Self {
        Self {
            uuid: CouponRuleUuid::new(),
            scope,
            min_quantity: None,
            min_subtotal: None,
            buy_get: None,
        }
    }

    pub(crate) fn scope_type_as_str(&self) -> &'static str {
        match self.scope {
            Scope::Global => "global",
            Scope::Category(_) => "category",
            Scope::Product(_) => "product",
        }
    }

    pub(crate) fn scope_value(&self) -> Option<Uuid> {
        match self.scope {
            Scope::Global => None,
            Scope::Category(uuid) | Scope::Product(uuid) => Some(uuid),
        }
    }
}

/// Coupon Record
#[derive(Debug, Clone, PartialEq)]
pub struct CouponRecord {
    pub uuid: CouponUuid,
    pub code: String,
    pub status: CouponStatus,
    pub discount: CouponDiscount,
    pub usage_limit: Option<u32>,
    pub per_user_limit: Option<u32>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub rules: Vec<CouponRuleRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Coupon Redemption Record
#[derive(Debug, Clone, PartialEq)]
pub struct CouponRedemptionRecord {
    pub uuid: CouponRedemptionUuid,
    pub coupon_uuid: CouponUuid,
    pub user_uuid: Option<UserUuid>,
    pub order_uuid: OrderUuid,
    pub discount_applied: u64,
    pub created_at: Timestamp,
}

pub(crate) fn target_as_str(target: BuyGetTarget) -> &'static str {
    match target {
        BuyGetTarget::SameCategory => "same_category",
        BuyGetTarget::SameProduct => "same_product",
    }
}

pub(crate) fn target_from_str(value: &str) -> Option<BuyGetTarget> {
    match value {
        "same_category" => Some(BuyGetTarget::SameCategory),
        "same_product" => Some(BuyGetTarget::SameProduct),
        _ => None,
    }
}
