//! Errors

use salvo::http::StatusError;
use tracing::error;

use vitrine_app::domain::coupons::CouponsServiceError;

/// Machine readable kind reported alongside the message shown at checkout.
pub(crate) fn error_kind(error: &CouponsServiceError) -> &'static str {
    match error {
        CouponsServiceError::NotFound => "NotFound",
        CouponsServiceError::Inactive => "Inactive",
        CouponsServiceError::OutOfWindow => "OutOfWindow",
        CouponsServiceError::UsageExceeded => "UsageExceeded",
        CouponsServiceError::PerUserLimitExceeded => "PerUserLimitExceeded",
        CouponsServiceError::StackingNotAllowed => "StackingNotAllowed",
        CouponsServiceError::InvalidCart(_) | CouponsServiceError::Discount(_) => "InvalidCart",
        CouponsServiceError::Rates(_) => "UnsupportedCurrency",
        CouponsServiceError::AlreadyExists
        | CouponsServiceError::InvalidReference
        | CouponsServiceError::MissingRequiredData
        | CouponsServiceError::InvalidData => "InvalidData",
        CouponsServiceError::Sql(_) => "Internal",
    }
}

pub(crate) fn into_status_error(error: CouponsServiceError) -> StatusError {
    let kind = error_kind(&error);

    match error {
        CouponsServiceError::NotFound => StatusError::bad_request()
            .brief("This coupon code does not exist.")
            .detail(kind),
        CouponsServiceError::Inactive => StatusError::bad_request()
            .brief("This coupon is no longer active.")
            .detail(kind),
        CouponsServiceError::OutOfWindow => StatusError::bad_request()
            .brief("This coupon cannot be used at this time.")
            .detail(kind),
        CouponsServiceError::UsageExceeded => StatusError::bad_request()
            .brief("This coupon has reached its usage limit.")
            .detail(kind),
        CouponsServiceError::PerUserLimitExceeded => StatusError::bad_request()
            .brief("You have already used this coupon the maximum number of times.")
            .detail(kind),
        CouponsServiceError::StackingNotAllowed => StatusError::bad_request()
            .brief("Only one coupon can be applied to an order.")
            .detail(kind),
        CouponsServiceError::InvalidCart(_) | CouponsServiceError::Discount(_) => {
            StatusError::bad_request()
                .brief("The cart could not be priced.")
                .detail(kind)
        }
        CouponsServiceError::Rates(_) => StatusError::bad_request()
            .brief("This currency is not supported.")
            .detail(kind),
        CouponsServiceError::AlreadyExists
        | CouponsServiceError::InvalidReference
        | CouponsServiceError::MissingRequiredData
        | CouponsServiceError::InvalidData => {
            error!("coupon data is inconsistent: {error}");

            StatusError::internal_server_error()
        }
        CouponsServiceError::Sql(source) => {
            error!("failed to apply coupon: {source}");

            StatusError::internal_server_error()
        }
    }
}
