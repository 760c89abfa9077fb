//! Apply Coupon Handler

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vitrine_app::domain::{
    coupons::data::{ApplyCoupon, CartInput, CartItemInput, CouponApplication, FreeUnitsBreakdown},
    users::UserUuid,
};

use crate::{coupons::errors::into_status_error, extensions::*};

/// A cart line, priced in minor units of the cart currency
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartItemRequest {
    pub product_id: Uuid,
    pub category_id: Uuid,
    pub unit_price: i64,
    pub quantity: u32,
}

/// Cart being checked out
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartRequest {
    /// ISO-4217 currency code
    pub currency: String,

    pub items: Vec<CartItemRequest>,

    /// Code of a coupon already applied to this cart
    #[serde(default)]
    pub applied_coupon: Option<String>,
}

/// Apply Coupon Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApplyCouponRequest {
    pub code: String,
    pub cart: CartRequest,

    /// Signed-in customer, used for per-customer limits
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

impl From<ApplyCouponRequest> for ApplyCoupon {
    fn from(request: ApplyCouponRequest) -> Self {
        ApplyCoupon {
            code: request.code,
            cart: CartInput {
                currency: request.cart.currency,
                items: request
                    .cart
                    .items
                    .into_iter()
                    .map(|item| CartItemInput {
                        product_uuid: item.product_id,
                        category_uuid: item.category_id,
                        unit_price: item.unit_price,
                        quantity: item.quantity,
                    })
                    .collect(),
            },
            applied_coupon: request.cart.applied_coupon,
            user: request.user_id.map(UserUuid::from_uuid),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AppliedCouponResponse {
    pub id: Uuid,
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub(crate) struct FreeUnitsResponse {
    /// Index of the cart line
    pub line: usize,
    pub units: u64,
    pub amount: i64,
}

impl From<FreeUnitsBreakdown> for FreeUnitsResponse {
    fn from(free: FreeUnitsBreakdown) -> Self {
        FreeUnitsResponse {
            line: free.line,
            units: free.units,
            amount: free.amount,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BreakdownResponse {
    pub eligible_subtotal: i64,

    /// Indices of the cart lines the coupon applies to
    pub eligible_lines: Vec<usize>,

    pub free_units: Vec<FreeUnitsResponse>,

    /// Whether the percentage discount was limited by its maximum
    pub capped: bool,
}

/// Apply Coupon Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ApplyCouponResponse {
    pub ok: bool,

    /// Discount in minor units of `currency`
    pub discount: i64,

    pub currency: String,
    pub coupon: AppliedCouponResponse,
    pub breakdown: BreakdownResponse,
}

impl From<CouponApplication> for ApplyCouponResponse {
    fn from(application: CouponApplication) -> Self {
        ApplyCouponResponse {
            ok: true,
            discount: application.discount,
            currency: application.currency.to_string(),
            coupon: AppliedCouponResponse {
                id: application.coupon_uuid.into_uuid(),
                code: application.code,
            },
            breakdown: BreakdownResponse {
                eligible_subtotal: application.eligible_subtotal,
                eligible_lines: application.eligible_lines,
                free_units: application.free_units.into_iter().map(Into::into).collect(),
                capped: application.capped,
            },
        }
    }
}

/// Apply Coupon Handler
///
/// Validates a coupon code and prices it against the submitted cart. Nothing is recorded.
#[endpoint(
    tags("coupons"),
    summary = "Apply Coupon",
    responses(
        (status_code = StatusCode::OK, description = "Discount computed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Coupon cannot be applied"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ApplyCouponRequest>,
    depot: &mut Depot,
) -> Result<Json<ApplyCouponResponse>, StatusError> {
    let state = depot.app_state()?;

    let application = state
        .app
        .coupons
        .apply_coupon(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(application.into()))
}
