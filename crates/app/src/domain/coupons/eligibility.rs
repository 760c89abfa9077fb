//! Coupon eligibility
//!
//! Whether a coupon may be used right now, decided from the coupon, its redemption counts and
//! the current time alone.

use jiff::Timestamp;

use crate::domain::coupons::{
    errors::CouponsServiceError,
    records::{CouponRecord, CouponStatus},
};

/// Redemptions recorded against a coupon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CouponUsage {
    /// Redemptions by anyone
    pub total: u64,

    /// Redemptions by the user being checked, when one is known
    pub by_user: Option<u64>,
}

/// Normalise a customer-entered coupon code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Check that a coupon can be redeemed at `now`.
///
/// The validity window is inclusive at both ends. The per-user limit is only checked when
/// `usage.by_user` is known.
///
/// # Errors
///
/// Returns the first failing check, in order: [`CouponsServiceError::Inactive`],
/// [`CouponsServiceError::OutOfWindow`], [`CouponsServiceError::UsageExceeded`],
/// [`CouponsServiceError::PerUserLimitExceeded`].
pub fn check_eligibility(
    coupon: &CouponRecord,
    usage: CouponUsage,
    now: Timestamp,
) -> Result<(), CouponsServiceError> {
    if coupon.status != CouponStatus::Active {
        return Err(CouponsServiceError::Inactive);
    }

    if coupon.starts_at.is_some_and(|starts_at| now < starts_at)
        || coupon.ends_at.is_some_and(|ends_at| now > ends_at)
    {
        return Err(CouponsServiceError::OutOfWindow);
    }

    if let Some(limit) = coupon.usage_limit
        && usage.total >= u64::from(limit)
    {
        return Err(CouponsServiceError::UsageExceeded);
    }

    if let (Some(limit), Some(used)) = (coupon.per_user_limit, usage.by_user)
        && used >= u64::from(limit)
    {
        return Err(CouponsServiceError::PerUserLimitExceeded);
    }

    Ok(())
}
