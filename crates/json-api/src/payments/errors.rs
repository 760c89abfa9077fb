//! Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use vitrine_app::domain::{orders::SettlementError, payments::PaymentEventError};

/// Rejected deliveries are answered with 400 so the gateway does not retry them.
pub(crate) fn event_status_error(error: &PaymentEventError) -> StatusError {
    warn!("rejected payment webhook: {error}");

    match error {
        PaymentEventError::AuthenticityFailed { .. } => StatusError::bad_request()
            .brief("Webhook signature could not be verified")
            .detail("AuthenticityFailed"),
        PaymentEventError::Malformed { .. } => StatusError::bad_request()
            .brief("Webhook payload is not a valid payment event")
            .detail("Malformed"),
    }
}

/// Settlement failures are answered with 500 so the gateway redelivers the event.
///
/// Terminal failures fail the same way on every redelivery. They are logged and answered apart
/// from retryable ones so they can be alerted on separately.
pub(crate) fn settlement_status_error(error: &SettlementError) -> StatusError {
    match error {
        SettlementError::InsufficientStock {
            product,
            requested,
            available,
        } => {
            error!(
                product = %product,
                requested,
                available,
                "payment settlement failed: insufficient stock"
            );

            retryable(settlement_kind(error))
        }
        SettlementError::TransientStoreFailure { attempts, source } => {
            error!(attempts, "payment settlement failed: store unavailable: {source}");

            retryable(settlement_kind(error))
        }
        SettlementError::Sql(source) => {
            error!("payment settlement failed: {source}");

            retryable(settlement_kind(error))
        }
        SettlementError::OrderNotFound
        | SettlementError::NotPayable { .. }
        | SettlementError::PaymentAlreadyRecorded
        | SettlementError::InvalidReference
        | SettlementError::InvalidData => {
            error!(
                terminal = true,
                "payment settlement failed permanently, order needs manual review: {error}"
            );

            terminal(settlement_kind(error))
        }
    }
}

fn settlement_kind(error: &SettlementError) -> &'static str {
    match error {
        SettlementError::OrderNotFound => "OrderNotFound",
        SettlementError::NotPayable { .. } => "NotPayable",
        SettlementError::InsufficientStock { .. } => "InsufficientStock",
        SettlementError::PaymentAlreadyRecorded => "PaymentAlreadyRecorded",
        SettlementError::InvalidReference => "InvalidReference",
        SettlementError::InvalidData => "InvalidData",
        SettlementError::TransientStoreFailure { .. } => "TransientStoreFailure",
        SettlementError::Sql(_) => "Sql",
    }
}

fn retryable(kind: &'static str) -> StatusError {
    StatusError::internal_server_error()
        .brief("Settlement failed, redeliver the event")
        .detail(kind)
}

fn terminal(kind: &'static str) -> StatusError {
    StatusError::internal_server_error()
        .brief("Settlement cannot complete, the order needs manual review")
        .detail(kind)
}
