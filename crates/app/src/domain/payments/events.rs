//! Payment events
//!
//! Only `payment_intent.succeeded` settles an order. Checkout stores the order id, the coupon id
//! and the discount (a major-unit decimal string) in the payment intent's metadata.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;
use vitrine::rates::{find_currency, major_to_minor};

use crate::domain::{
    coupons::records::CouponUuid,
    orders::{data::PaymentConfirmation, records::OrderUuid},
    payments::errors::PaymentEventError,
};

pub const PAYMENT_SUCCEEDED: &str = "payment_intent.succeeded";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    /// Payment captured; the order can be settled.
    Succeeded(PaymentConfirmation),

    /// Any other event type, or a payment not started by checkout, acknowledged without action.
    Ignored { event_type: String },
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    event_type: String,
    data: RawData,
}

#[derive(Debug, Deserialize)]
struct RawData {
    object: Value,
}

#[derive(Debug, Deserialize)]
struct RawPaymentIntent {
    id: String,
    currency: Option<String>,
    #[serde(default)]
    metadata: RawMetadata,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMetadata {
    order_id: Option<String>,
    coupon_id: Option<String>,
    discount: Option<String>,
}

/// Parse an authenticated webhook payload.
///
/// # Errors
///
/// Returns [`PaymentEventError::Malformed`] when the payload is not an event, or a succeeded
/// payment carries an unusable order id, coupon id, currency or discount. A succeeded payment
/// without an order id did not come from checkout and is ignored.
pub fn parse_event(payload: &[u8]) -> Result<PaymentEvent, PaymentEventError> {
    let event: RawEvent = serde_json::from_slice(payload)?;

    if event.event_type != PAYMENT_SUCCEEDED {
        return Ok(PaymentEvent::Ignored {
            event_type: event.event_type,
        });
    }

    let intent: RawPaymentIntent = serde_json::from_value(event.data.object)?;

    let Some(order_id) = intent.metadata.order_id.filter(|id| !id.trim().is_empty()) else {
        warn!(
            provider_payment_id = %intent.id,
            "succeeded payment has no order id, ignoring"
        );

        return Ok(PaymentEvent::Ignored {
            event_type: event.event_type,
        });
    };

    let order_uuid = parse_uuid(&order_id, "metadata.orderId")?;

    let coupon_uuid = intent
        .metadata
        .coupon_id
        .filter(|id| !id.trim().is_empty())
        .map(|id| parse_uuid(&id, "metadata.couponId"))
        .transpose()?;

    let discount_applied = match (coupon_uuid, intent.metadata.discount) {
        (Some(_), Some(discount)) => Some(discount_minor(&discount, intent.currency.as_deref())?),
        _ => None,
    };

    Ok(PaymentEvent::Succeeded(PaymentConfirmation {
        order_uuid: OrderUuid::from_uuid(order_uuid),
        provider_payment_id: intent.id,
        coupon_uuid: coupon_uuid.map(CouponUuid::from_uuid),
        discount_applied,
    }))
}

fn parse_uuid(value: &str, field: &str) -> Result<Uuid, PaymentEventError> {
    Uuid::parse_str(value.trim())
        .map_err(|error| PaymentEventError::malformed(format!("{field} is not a UUID: {error}")))
}

/// Minor units of a major-unit decimal string, rounded half away from zero.
fn discount_minor(discount: &str, currency: Option<&str>) -> Result<u64, PaymentEventError> {
    let currency = currency
        .ok_or_else(|| PaymentEventError::malformed("currency is missing"))
        .and_then(|code| {
            find_currency(code).map_err(|error| PaymentEventError::malformed(error.to_string()))
        })?;

    let amount = discount
        .trim()
        .parse::<Decimal>()
        .map_err(|error| PaymentEventError::malformed(format!("discount: {error}")))?;

    let minor = major_to_minor(amount, currency)
        .map_err(|error| PaymentEventError::malformed(format!("discount: {error}")))?;

    u64::try_from(minor)
        .map_err(|_negative| PaymentEventError::malformed("discount must not be negative"))
}
