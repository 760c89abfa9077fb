//! Coupons Data

use jiff::Timestamp;
use uuid::Uuid;

use crate::domain::{
    coupons::records::{
        CouponDiscount, CouponRecord, CouponRuleRecord, CouponStatus, CouponUuid,
    },
    users::UserUuid,
};

/// New Coupon Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCoupon {
    pub uuid: CouponUuid,
    /// Normalised to trimmed upper case on creation
    pub code: String,
    pub status: CouponStatus,
    pub discount: CouponDiscount,
    pub usage_limit: Option<u32>,
    pub per_user_limit: Option<u32>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub rules: Vec<CouponRuleRecord>,
}

/// Coupon Update Data
///
/// Replaces every mutable field. The code and discount are fixed once a coupon exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponUpdate {
    pub status: CouponStatus,
    pub usage_limit: Option<u32>,
    pub per_user_limit: Option<u32>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
}

impl From<&CouponRecord> for CouponUpdate {
    fn from(coupon: &CouponRecord) -> Self {
        Self {
            status: coupon.status,
            usage_limit: coupon.usage_limit,
            per_user_limit: coupon.per_user_limit,
            starts_at: coupon.starts_at,
            ends_at: coupon.ends_at,
        }
    }
}

/// A cart line submitted for coupon evaluation. Prices are minor units of the cart currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemInput {
    pub product_uuid: Uuid,
    pub category_uuid: Uuid,
    pub unit_price: i64,
    pub quantity: u32,
}

/// A cart submitted for coupon evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartInput {
    pub currency: String,
    pub items: Vec<CartItemInput>,
}

/// Request to price a coupon against a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyCoupon {
    pub code: String,
    pub cart: CartInput,
    /// Code of a coupon already applied to the cart
    pub applied_coupon: Option<String>,
    pub user: Option<UserUuid>,
}

/// Units a buy-get coupon makes free on one cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeUnitsBreakdown {
    pub line: usize,
    pub units: u64,
    pub amount: i64,
}

/// The discount a coupon grants on a cart. Amounts are minor units of `currency`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponApplication {
    pub coupon_uuid: CouponUuid,
    pub code: String,
    pub currency: &'static str,
    pub discount: i64,
    pub eligible_subtotal: i64,
    pub eligible_lines: Vec<usize>,
    pub free_units: Vec<FreeUnitsBreakdown>,
    pub capped: bool,
}
