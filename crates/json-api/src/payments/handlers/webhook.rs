//! Payment Webhook Handler

use jiff::Timestamp;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use vitrine_app::domain::{
    orders::SettlementError,
    payments::{PaymentEvent, PaymentEventError, parse_event},
};

use crate::{
    extensions::*,
    payments::errors::{event_status_error, settlement_status_error},
};

pub(crate) const SIGNATURE_HEADER: &str = "stripe-signature";

/// Webhook Acknowledgement
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WebhookResponse {
    pub received: bool,
}

const RECEIVED: WebhookResponse = WebhookResponse { received: true };

/// Payment Webhook Handler
///
/// Verifies the gateway signature over the raw body, then settles successful payments.
/// Duplicate deliveries, unrelated event types, payments without an order and unknown orders
/// are acknowledged.
#[endpoint(
    tags("payments"),
    summary = "Payment Gateway Webhook",
    responses(
        (status_code = StatusCode::OK, description = "Event accepted"),
        (status_code = StatusCode::BAD_REQUEST, description = "Signature or payload rejected"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Settlement failed, retryable or needs manual review"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<WebhookResponse>, StatusError> {
    let state = depot.app_state()?;

    let signature = req.header::<String>(SIGNATURE_HEADER).ok_or_else(|| {
        event_status_error(&PaymentEventError::AuthenticityFailed {
            reason: "signature header is missing",
        })
    })?;

    let payload = req
        .payload()
        .await
        .or_internal("read webhook body")?;

    let event = state
        .webhooks
        .verify(payload, &signature, Timestamp::now())
        .and_then(|()| parse_event(payload))
        .map_err(|error| event_status_error(&error))?;

    let confirmation = match event {
        PaymentEvent::Succeeded(confirmation) => confirmation,
        PaymentEvent::Ignored { event_type } => {
            info!(event_type = %event_type, "ignoring payment event");

            return Ok(Json(RECEIVED));
        }
    };

    let order = confirmation.order_uuid;

    match state.app.settlement.settle(confirmation).await {
        Ok(outcome) => {
            info!(order = %order, outcome = outcome.as_str(), "payment settled");

            Ok(Json(RECEIVED))
        }
        Err(SettlementError::OrderNotFound) => {
            warn!(order = %order, "payment received for unknown order, dropping");

            Ok(Json(RECEIVED))
        }
        Err(error) => Err(settlement_status_error(&error)),
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;
    use uuid::Uuid;

    use vitrine_app::domain::{
        coupons::records::CouponUuid,
        orders::{
            MockSettlementService, SettlementOutcome,
            data::PaymentConfirmation,
            records::{OrderStatus, OrderUuid},
        },
        payments::{WebhookVerifier, signature::DEFAULT_TOLERANCE},
        products::records::ProductUuid,
    };

    use crate::test_helpers::{settlement_service, test_verifier};

    use super::*;

    fn make_service(settlement: MockSettlementService) -> Service {
        settlement_service(
            settlement,
            Router::with_path("payments/webhook").post(handler),
        )
    }

    fn succeeded(order: OrderUuid, coupon: CouponUuid) -> Vec<u8> {
        json!({
            "type": "payment_intent.succeeded",
            "data": {
                "object": {
                    "id": "pi_123",
                    "currency": "try",
                    "metadata": {
                        "orderId": order.to_string(),
                        "couponId": coupon.to_string(),
                        "discount": "10.00"
                    }
                }
            }
        })
        .to_string()
        .into_bytes()
    }

    async fn deliver(service: &Service, payload: Vec<u8>, signature: &str) -> Response {
        TestClient::post("http://example.com/payments/webhook")
            .add_header(SIGNATURE_HEADER, signature, true)
            .add_header("content-type", "application/json", true)
            .bytes(payload)
            .send(service)
            .await
    }

    fn sign(payload: &[u8]) -> Result<String, PaymentEventError> {
        test_verifier().sign(payload, Timestamp::now())
    }

    #[tokio::test]
    async fn test_signed_payment_is_settled() -> TestResult {
        let order = OrderUuid::new();
        let coupon = CouponUuid::new();
        let payload = succeeded(order, coupon);

        let mut settlement = MockSettlementService::new();

        settlement
            .expect_settle()
            .once()
            .withf(move |confirmation| {
                *confirmation
                    == PaymentConfirmation {
                        order_uuid: order,
                        provider_payment_id: "pi_123".to_string(),
                        coupon_uuid: Some(coupon),
                        discount_applied: Some(1_000),
                    }
            })
            .return_once(|_| Ok(SettlementOutcome::Settled));

        let signature = sign(&payload)?;
        let mut res = deliver(&make_service(settlement), payload, &signature).await;

        let body: WebhookResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.received, "expected acknowledgement");

        Ok(())
    }

    #[tokio::test]
    async fn test_redelivery_is_acknowledged() -> TestResult {
        let payload = succeeded(OrderUuid::new(), CouponUuid::new());

        let mut settlement = MockSettlementService::new();

        settlement
            .expect_settle()
            .once()
            .return_once(|_| Ok(SettlementOutcome::AlreadySettled));

        let signature = sign(&payload)?;
        let res = deliver(&make_service(settlement), payload, &signature).await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_bad_signature_never_reaches_settlement() -> TestResult {
        let payload = succeeded(OrderUuid::new(), CouponUuid::new());

        let mut settlement = MockSettlementService::new();

        settlement.expect_settle().never();

        let forged = WebhookVerifier::new("whsec_other", DEFAULT_TOLERANCE).sign(&payload, Timestamp::now())?;
        let res = deliver(&make_service(settlement), payload, &forged).await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_stale_signature_is_rejected() -> TestResult {
        let payload = succeeded(OrderUuid::new(), CouponUuid::new());

        let mut settlement = MockSettlementService::new();

        settlement.expect_settle().never();

        let stale = Timestamp::now() - SignedDuration::from_mins(10);
        let signature = test_verifier().sign(&payload, stale)?;
        let res = deliver(&make_service(settlement), payload, &signature).await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_signature_is_rejected() -> TestResult {
        let mut settlement = MockSettlementService::new();

        settlement.expect_settle().never();

        let res = TestClient::post("http://example.com/payments/webhook")
            .bytes(succeeded(OrderUuid::new(), CouponUuid::new()))
            .send(&make_service(settlement))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_other_event_types_are_ignored() -> TestResult {
        let payload = json!({
            "type": "payment_intent.created",
            "data": { "object": { "id": "pi_123" } }
        })
        .to_string()
        .into_bytes();

        let mut settlement = MockSettlementService::new();

        settlement.expect_settle().never();

        let signature = sign(&payload)?;
        let res = deliver(&make_service(settlement), payload, &signature).await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_payment_without_order_is_acknowledged() -> TestResult {
        let payload = json!({
            "type": "payment_intent.succeeded",
            "data": { "object": { "id": "pi_x", "currency": "usd", "metadata": {} } }
        })
        .to_string()
        .into_bytes();

        let mut settlement = MockSettlementService::new();

        settlement.expect_settle().never();

        let signature = sign(&payload)?;
        let mut res = deliver(&make_service(settlement), payload, &signature).await;

        let body: WebhookResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.received, "expected acknowledgement");

        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_event_returns_400() -> TestResult {
        let payload = json!({
            "type": "payment_intent.succeeded",
            "data": { "object": { "id": "pi_123", "metadata": { "orderId": "order-42" } } }
        })
        .to_string()
        .into_bytes();

        let mut settlement = MockSettlementService::new();

        settlement.expect_settle().never();

        let signature = sign(&payload)?;
        let res = deliver(&make_service(settlement), payload, &signature).await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_order_is_acknowledged() -> TestResult {
        let payload = succeeded(OrderUuid::new(), CouponUuid::new());

        let mut settlement = MockSettlementService::new();

        settlement
            .expect_settle()
            .once()
            .return_once(|_| Err(SettlementError::OrderNotFound));

        let signature = sign(&payload)?;
        let res = deliver(&make_service(settlement), payload, &signature).await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_insufficient_stock_returns_500_for_redelivery() -> TestResult {
        let payload = succeeded(OrderUuid::new(), CouponUuid::new());

        let mut settlement = MockSettlementService::new();

        settlement.expect_settle().once().return_once(|_| {
            Err(SettlementError::InsufficientStock {
                product: ProductUuid::from_uuid(Uuid::nil()),
                requested: 3,
                available: 1,
            })
        });

        let signature = sign(&payload)?;
        let res = deliver(&make_service(settlement), payload, &signature).await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }

    #[tokio::test]
    async fn test_payment_for_cancelled_order_needs_review() -> TestResult {
        let payload = succeeded(OrderUuid::new(), CouponUuid::new());

        let mut settlement = MockSettlementService::new();

        settlement.expect_settle().once().return_once(|_| {
            Err(SettlementError::NotPayable {
                status: OrderStatus::Cancelled,
            })
        });

        let signature = sign(&payload)?;
        let mut res = deliver(&make_service(settlement), payload, &signature).await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(res.take_string().await?.contains("manual review"));

        Ok(())
    }
}
