//! Coupons service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;
use vitrine::{cart::CartError, discounts::DiscountError, rates::RateError};

#[derive(Debug, Error)]
pub enum CouponsServiceError {
    #[error("coupon code not found")]
    NotFound,

    #[error("coupon is not active")]
    Inactive,

    #[error("coupon is not valid at this time")]
    OutOfWindow,

    #[error("coupon usage limit reached")]
    UsageExceeded,

    #[error("coupon usage limit for this user reached")]
    PerUserLimitExceeded,

    #[error("another coupon is already applied")]
    StackingNotAllowed,

    #[error("coupon code already exists")]
    AlreadyExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("invalid cart")]
    InvalidCart(#[from] CartError),

    #[error("currency conversion failed")]
    Rates(#[from] RateError),

    #[error("discount calculation failed")]
    Discount(#[source] DiscountError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<DiscountError> for CouponsServiceError {
    fn from(error: DiscountError) -> Self {
        match error {
            DiscountError::Cart(error) => Self::InvalidCart(error),
            other => Self::Discount(other),
        }
    }
}

impl From<Error> for CouponsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}
