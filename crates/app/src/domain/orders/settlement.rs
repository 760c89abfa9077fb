//! Settlement
//!
//! Turns a verified payment confirmation into a paid order. Everything happens in one
//! transaction: the order row is locked, marked paid, every item's stock is taken and the coupon
//! redemption is recorded. Any failure rolls the whole settlement back, and a confirmation for an
//! order that is already paid changes nothing.

use std::time::Duration;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rand::Rng;
use tracing::{Span, error, info, warn};

use crate::{
    database::{self, Db},
    domain::{
        coupons::PgCouponsRepository,
        orders::{
            data::PaymentConfirmation,
            errors::SettlementError,
            records::{OrderStatus, OrderUuid},
            repository::PgOrdersRepository,
        },
        products::PgProductsRepository,
    },
};

/// Bounds on a single settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementSettings {
    /// Statement and lock timeout applied to every attempt
    pub statement_timeout: Duration,

    /// Attempts made before a transient store failure is reported
    pub max_attempts: u32,

    /// Delay before the first retry, doubled for each retry after it
    pub retry_backoff: Duration,
}

impl Default for SettlementSettings {
    fn default() -> Self {
        Self {
            statement_timeout: Duration::from_secs(5),
            max_attempts: 3,
            retry_backoff: Duration::from_millis(50),
        }
    }
}

impl SettlementSettings {
    /// Delay before retry number `retry` (starting at 1), with up to 50% added jitter.
    fn backoff(&self, retry: u32) -> Duration {
        let base = self
            .retry_backoff
            .saturating_mul(2_u32.saturating_pow(retry.saturating_sub(1)));

        let jitter_ceiling = u64::try_from(base.as_millis() / 2).unwrap_or(u64::MAX);
        let jitter = rand::thread_rng().gen_range(0..=jitter_ceiling);

        base.saturating_add(Duration::from_millis(jitter))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementOutcome {
    /// The order was paid by this confirmation.
    Settled,

    /// The order had already been paid; nothing changed.
    AlreadySettled,
}

impl SettlementOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Settled => "settled",
            Self::AlreadySettled => "already_settled",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgSettlementService {
    db: Db,
    settings: SettlementSettings,
    orders: PgOrdersRepository,
    products: PgProductsRepository,
    coupons: PgCouponsRepository,
}

impl PgSettlementService {
    #[must_use]
    pub fn new(db: Db, settings: SettlementSettings) -> Self {
        Self {
            db,
            settings,
            orders: PgOrdersRepository::new(),
            products: PgProductsRepository::new(),
            coupons: PgCouponsRepository::new(),
        }
    }

    async fn attempt(
        &self,
        confirmation: &PaymentConfirmation,
    ) -> Result<SettlementOutcome, SettlementError> {
        let mut tx = self
            .db
            .begin_with_timeout(self.settings.statement_timeout)
            .await?;

        let order_uuid = confirmation.order_uuid;

        let Some(order) = self.orders.lock_order(&mut tx, order_uuid).await? else {
            return Err(SettlementError::OrderNotFound);
        };

        if order.is_settled() {
            tx.rollback().await?;

            return Ok(SettlementOutcome::AlreadySettled);
        }

        if order.status != OrderStatus::Created {
            return Err(SettlementError::NotPayable {
                status: order.status,
            });
        }

        let Some(order) = self
            .orders
            .mark_paid(
                &mut tx,
                order_uuid,
                Timestamp::now(),
                &confirmation.provider_payment_id,
            )
            .await?
        else {
            return Ok(SettlementOutcome::AlreadySettled);
        };

        for item in self.orders.list_items(&mut tx, order_uuid).await? {
            let requested = i32::try_from(item.quantity)
                .map_err(|_overflow| SettlementError::InvalidData)?;

            let remaining = self
                .products
                .decrement_stock(&mut tx, item.product_uuid, requested)
                .await?;

            if remaining.is_none() {
                let available = self
                    .products
                    .get_stock(&mut tx, item.product_uuid)
                    .await?
                    .and_then(|stock| u32::try_from(stock).ok())
                    .unwrap_or_default();

                return Err(SettlementError::InsufficientStock {
                    product: item.product_uuid,
                    requested: item.quantity,
                    available,
                });
            }
        }

        if let (Some(coupon), Some(discount)) =
            (confirmation.coupon_uuid, confirmation.discount_applied)
            && discount > 0
        {
            let discount =
                i64::try_from(discount).map_err(|_overflow| SettlementError::InvalidData)?;

            let redemption = self
                .coupons
                .create_redemption(&mut tx, coupon, order.user_uuid, order_uuid, discount)
                .await?;

            if redemption.is_none() {
                warn!(coupon_uuid = %coupon, "coupon already redeemed for this order");
            }
        }

        tx.commit().await?;

        Ok(SettlementOutcome::Settled)
    }
}

#[async_trait]
impl SettlementService for PgSettlementService {
    #[tracing::instrument(
        name = "orders.settlement.settle",
        skip(self, confirmation),
        fields(
            order_uuid = %confirmation.order_uuid,
            provider_payment_id = %confirmation.provider_payment_id,
            coupon_uuid = ?confirmation.coupon_uuid,
            attempts = tracing::field::Empty,
            outcome = tracing::field::Empty
        ),
        err
    )]
    async fn settle(
        &self,
        confirmation: PaymentConfirmation,
    ) -> Result<SettlementOutcome, SettlementError> {
        let span = Span::current();
        let max_attempts = self.settings.max_attempts.max(1);
        let mut attempts = 1;

        loop {
            span.record("attempts", attempts);

            match self.attempt(&confirmation).await {
                Ok(outcome) => {
                    span.record("outcome", outcome.as_str());

                    info!(outcome = outcome.as_str(), "settled payment");

                    return Ok(outcome);
                }
                Err(SettlementError::Sql(source)) if database::is_transient(&source) => {
                    if attempts >= max_attempts {
                        error!(
                            order_uuid = %confirmation.order_uuid,
                            attempts,
                            error = %source,
                            "settlement failed after retries; payment confirmed but order unpaid"
                        );

                        return Err(SettlementError::TransientStoreFailure { attempts, source });
                    }

                    let delay = self.settings.backoff(attempts);

                    warn!(
                        attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %source,
                        "transient store failure, retrying settlement"
                    );

                    tokio::time::sleep(delay).await;

                    attempts += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

#[automock]
#[async_trait]
pub trait SettlementService: Send + Sync {
    /// Settle a verified payment confirmation against its order.
    ///
    /// Confirmations may be delivered more than once; only the first one has any effect.
    async fn settle(
        &self,
        confirmation: PaymentConfirmation,
    ) -> Result<SettlementOutcome, SettlementError>;
}
