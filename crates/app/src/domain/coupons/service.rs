//! Coupons Service

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{Span, info};
use vitrine::evaluation::evaluate;

use crate::{
    database::Db,
    domain::{
        coupons::{
            CouponsServiceError,
            data::{ApplyCoupon, CouponApplication, CouponUpdate, FreeUnitsBreakdown, NewCoupon},
            eligibility::{check_eligibility, normalize_code},
            records::{CouponDiscount, CouponRecord, CouponRuleRecord},
            repository::PgCouponsRepository,
            terms::{cart_from_input, coupon_terms},
        },
        rates::{PgRatesRepository, records::RateTable},
        users::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCouponsService {
    db: Db,
    coupons: PgCouponsRepository,
    rates: PgRatesRepository,
}

impl PgCouponsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            coupons: PgCouponsRepository::new(),
            rates: PgRatesRepository::new(),
        }
    }

    /// Load a coupon and check it is redeemable at `now`.
    async fn validate_at(
        &self,
        code: &str,
        user: Option<UserUuid>,
        now: Timestamp,
    ) -> Result<CouponRecord, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let coupon = self
            .coupons
            .get_coupon_by_code(&mut tx, &normalize_code(code))
            .await?;

        let usage = self
            .coupons
            .count_redemptions(&mut tx, coupon.uuid, user)
            .await?;

        tx.commit().await?;

        check_eligibility(&coupon, usage, now)?;

        Ok(coupon)
    }

    async fn rate_table(&self) -> Result<RateTable, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let base_currency = self.rates.get_base_currency(&mut tx).await?;
        let rates = self.rates.list_exchange_rates(&mut tx).await?;

        tx.commit().await?;

        Ok(RateTable {
            base_currency: base_currency.trim().to_string(),
            rates,
        })
    }
}

/// A coupon needs at least one rule, and every rule of a BOGO coupon carries buy-get terms.
fn check_rules(
    discount: CouponDiscount,
    rules: &[CouponRuleRecord],
) -> Result<(), CouponsServiceError> {
    if rules.is_empty() {
        return Err(CouponsServiceError::MissingRequiredData);
    }

    if matches!(discount, CouponDiscount::BuyGet)
        && rules.iter().any(|rule| rule.buy_get.is_none())
    {
        return Err(CouponsServiceError::InvalidData);
    }

    Ok(())
}

#[async_trait]
impl CouponsService for PgCouponsService {
    #[tracing::instrument(
        name = "coupons.service.create_coupon",
        skip(self, coupon),
        fields(
            coupon_uuid = %coupon.uuid,
            code = tracing::field::Empty,
            discount_type = coupon.discount.type_as_str(),
            rule_count = coupon.rules.len()
        ),
        err
    )]
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError> {
        let coupon = NewCoupon {
            code: normalize_code(&coupon.code),
            ..coupon
        };

        Span::current().record("code", tracing::field::display(&coupon.code));

        check_rules(coupon.discount, &coupon.rules)?;

        let mut tx = self.db.begin().await?;

        let mut record = self.coupons.create_coupon(&mut tx, &coupon).await?;

        for rule in &coupon.rules {
            self.coupons.create_rule(&mut tx, record.uuid, rule).await?;
        }

        tx.commit().await?;

        record.rules = coupon.rules;

        info!(coupon_uuid = %record.uuid, code = %record.code, "created coupon");

        Ok(record)
    }

    async fn get_coupon(&self, code: &str) -> Result<CouponRecord, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let coupon = self
            .coupons
            .get_coupon_by_code(&mut tx, &normalize_code(code))
            .await?;

        tx.commit().await?;

        Ok(coupon)
    }

    async fn list_coupons(&self) -> Result<Vec<CouponRecord>, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let coupons = self.coupons.list_coupons(&mut tx).await?;

        tx.commit().await?;

        Ok(coupons)
    }

    #[tracing::instrument(
        name = "coupons.service.update_coupon",
        skip(self, update),
        fields(status = update.status.as_str()),
        err
    )]
    async fn update_coupon(
        &self,
        code: &str,
        update: CouponUpdate,
    ) -> Result<CouponRecord, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let coupon = self
            .coupons
            .update_coupon(&mut tx, &normalize_code(code), &update)
            .await?;

        tx.commit().await?;

        info!(
            coupon_uuid = %coupon.uuid,
            code = %coupon.code,
            status = coupon.status.as_str(),
            "updated coupon"
        );

        Ok(coupon)
    }

    #[tracing::instrument(
        name = "coupons.service.replace_rules",
        skip(self, rules),
        fields(rule_count = rules.len()),
        err
    )]
    async fn replace_rules(
        &self,
        code: &str,
        rules: Vec<CouponRuleRecord>,
    ) -> Result<CouponRecord, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut coupon = self
            .coupons
            .get_coupon_by_code(&mut tx, &normalize_code(code))
            .await?;

        check_rules(coupon.discount, &rules)?;

        let removed = self.coupons.delete_rules(&mut tx, coupon.uuid).await?;

        for rule in &rules {
            self.coupons.create_rule(&mut tx, coupon.uuid, rule).await?;
        }

        tx.commit().await?;

        coupon.rules = rules;

        info!(
            coupon_uuid = %coupon.uuid,
            removed,
            added = coupon.rules.len(),
            "replaced coupon rules"
        );

        Ok(coupon)
    }

    #[tracing::instrument(
        name = "coupons.service.validate_coupon",
        skip(self),
        fields(user_uuid = ?user),
        err(level = "info")
    )]
    async fn validate_coupon(
        &self,
        code: &str,
        user: Option<UserUuid>,
    ) -> Result<CouponRecord, CouponsServiceError> {
        self.validate_at(code, user, Timestamp::now()).await
    }

    #[tracing::instrument(
        name = "coupons.service.apply_coupon",
        skip(self, request),
        fields(
            code = %request.code,
            currency = %request.cart.currency,
            line_count = request.cart.items.len(),
            coupon_uuid = tracing::field::Empty,
            discount = tracing::field::Empty
        ),
        err(level = "info")
    )]
    async fn apply_coupon(
        &self,
        request: ApplyCoupon,
    ) -> Result<CouponApplication, CouponsServiceError> {
        let code = normalize_code(&request.code);

        if let Some(applied) = &request.applied_coupon
            && normalize_code(applied) != code
        {
            return Err(CouponsServiceError::StackingNotAllowed);
        }

        let cart = cart_from_input(&request.cart)?;

        let coupon = self
            .validate_at(&code, request.user, Timestamp::now())
            .await?;

        let span = Span::current();

        span.record("coupon_uuid", tracing::field::display(coupon.uuid));

        let rates = self.rate_table().await?.exchange_rates()?;
        let terms = coupon_terms(&coupon, &rates, cart.currency())?;
        let evaluation = evaluate(&terms, &cart)?;

        let discount = evaluation.discount.to_minor_units();

        span.record("discount", discount);

        Ok(CouponApplication {
            coupon_uuid: coupon.uuid,
            code: coupon.code,
            currency: cart.currency().iso_alpha_code,
            discount,
            eligible_subtotal: evaluation.eligible_subtotal.to_minor_units(),
            eligible_lines: evaluation.eligible_lines.to_vec(),
            free_units: evaluation
                .free_units
                .iter()
                .map(|free| FreeUnitsBreakdown {
                    line: free.line,
                    units: free.units,
                    amount: free.amount,
                })
                .collect(),
            capped: evaluation.capped,
        })
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Create a coupon and its rules.
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError>;

    /// Load a coupon by code without checking whether it can be redeemed.
    async fn get_coupon(&self, code: &str) -> Result<CouponRecord, CouponsServiceError>;

    /// List every coupon with its rules, ordered by code.
    async fn list_coupons(&self) -> Result<Vec<CouponRecord>, CouponsServiceError>;

    /// Replace the status, limits and validity window of a coupon.
    async fn update_coupon(
        &self,
        code: &str,
        update: CouponUpdate,
    ) -> Result<CouponRecord, CouponsServiceError>;

    /// Swap every rule of a coupon for `rules` in one transaction.
    async fn replace_rules(
        &self,
        code: &str,
        rules: Vec<CouponRuleRecord>,
    ) -> Result<CouponRecord, CouponsServiceError>;

    /// Load a coupon by code and check it can be redeemed now, by `user` when given.
    async fn validate_coupon(
        &self,
        code: &str,
        user: Option<UserUuid>,
    ) -> Result<CouponRecord, CouponsServiceError>;

    /// Validate a coupon and compute the discount it grants on a cart.
    async fn apply_coupon(
        &self,
        request: ApplyCoupon,
    ) -> Result<CouponApplication, CouponsServiceError>;
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use jiff::SignedDuration;
    use rust_decimal::Decimal;
    use testresult::TestResult;
    use uuid::Uuid;
    use vitrine::{
        coupons::{BuyGetTarget, Scope},
        rates::RateError,
    };

    use crate::{
        domain::{
            coupons::{
                data::{CartInput, CartItemInput},
                records::{BuyGetTerms, CouponStatus, CouponUuid},
            },
            rates::RatesService,
        },
        test::{TestContext, helpers},
    };

    use super::*;

    fn item(category: Uuid, unit_price: i64, quantity: u32) -> CartItemInput {
        CartItemInput {
            product_uuid: Uuid::now_v7(),
            category_uuid: category,
            unit_price,
            quantity,
        }
    }

    fn apply(code: &str, currency: &str, items: Vec<CartItemInput>) -> ApplyCoupon {
        ApplyCoupon {
            code: code.to_string(),
            cart: CartInput {
                currency: currency.to_string(),
                items,
            },
            applied_coupon: None,
            user: None,
        }
    }

    #[tokio::test]
    async fn create_coupon_normalises_code_and_keeps_rules() -> TestResult {
        let ctx = TestContext::new().await;

        let coupon = ctx
            .coupons
            .create_coupon(helpers::amount_coupon("  spring10 ", 1_000))
            .await?;

        assert_eq!(coupon.code, "SPRING10");

        let loaded = ctx.coupons.get_coupon("spring10").await?;

        assert_eq!(loaded.uuid, coupon.uuid);
        assert_eq!(loaded.rules, coupon.rules);

        Ok(())
    }

    #[tokio::test]
    async fn create_coupon_rejects_duplicate_codes() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.coupons
            .create_coupon(helpers::amount_coupon("ONCE", 100))
            .await?;

        let result = ctx
            .coupons
            .create_coupon(helpers::amount_coupon("once", 100))
            .await;

        assert!(
            matches!(result, Err(CouponsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_bogo_coupon_requires_buy_get_terms() {
        let ctx = TestContext::new().await;

        let mut coupon = helpers::amount_coupon("BOGO", 0);
        coupon.discount = CouponDiscount::BuyGet;

        let result = ctx.coupons.create_coupon(coupon).await;

        assert!(
            matches!(result, Err(CouponsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_coupon_rejects_percent_over_one_hundred() {
        let ctx = TestContext::new().await;

        let mut coupon = helpers::amount_coupon("TOOMUCH", 0);
        coupon.discount = CouponDiscount::Percent {
            basis_points: 10_001,
            max_discount: None,
        };

        let result = ctx.coupons.create_coupon(coupon).await;

        assert!(
            matches!(result, Err(CouponsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn validate_unknown_code_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.coupons.validate_coupon("NOPE", None).await;

        assert!(
            matches!(result, Err(CouponsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn validate_rejects_disabled_and_expired_window() -> TestResult {
        let ctx = TestContext::new().await;

        let mut disabled = helpers::amount_coupon("OFF", 100);
        disabled.status = CouponStatus::Disabled;

        let mut ended = helpers::amount_coupon("ENDED", 100);
        ended.ends_at = Some(Timestamp::now() - SignedDuration::from_hours(1));

        ctx.coupons.create_coupon(disabled).await?;
        ctx.coupons.create_coupon(ended).await?;

        let disabled = ctx.coupons.validate_coupon("off", None).await;
        let ended = ctx.coupons.validate_coupon("ended", None).await;

        assert!(matches!(disabled, Err(CouponsServiceError::Inactive)));
        assert!(matches!(ended, Err(CouponsServiceError::OutOfWindow)));

        Ok(())
    }

    #[tokio::test]
    async fn validate_counts_redemptions_against_limits() -> TestResult {
        let ctx = TestContext::new().await;

        let mut coupon = helpers::amount_coupon("LIMITED", 100);
        coupon.usage_limit = Some(2);
        coupon.per_user_limit = Some(1);

        let coupon = ctx.coupons.create_coupon(coupon).await?;

        let user = UserUuid::new();

        helpers::redeem(&ctx, coupon.uuid, Some(user), 100).await?;

        assert!(ctx.coupons.validate_coupon("LIMITED", None).await.is_ok());
        assert!(matches!(
            ctx.coupons.validate_coupon("LIMITED", Some(user)).await,
            Err(CouponsServiceError::PerUserLimitExceeded)
        ));

        helpers::redeem(&ctx, coupon.uuid, None, 100).await?;

        assert!(matches!(
            ctx.coupons.validate_coupon("LIMITED", None).await,
            Err(CouponsServiceError::UsageExceeded)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn update_coupon_disabling_makes_validation_inactive() -> TestResult {
        let ctx = TestContext::new().await;

        let coupon = ctx
            .coupons
            .create_coupon(helpers::amount_coupon("LIVE", 100))
            .await?;

        ctx.coupons.validate_coupon("LIVE", None).await?;

        let update = CouponUpdate {
            status: CouponStatus::Disabled,
            ..CouponUpdate::from(&coupon)
        };

        let updated = ctx.coupons.update_coupon("live", update).await?;

        assert_eq!(updated.uuid, coupon.uuid);
        assert_eq!(updated.status, CouponStatus::Disabled);
        assert_eq!(updated.rules, coupon.rules);

        let result = ctx.coupons.validate_coupon("LIVE", None).await;

        assert!(
            matches!(result, Err(CouponsServiceError::Inactive)),
            "expected Inactive, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_coupon_moves_validity_window() -> TestResult {
        let ctx = TestContext::new().await;

        let coupon = ctx
            .coupons
            .create_coupon(helpers::amount_coupon("LATER", 100))
            .await?;

        let update = CouponUpdate {
            starts_at: Some(Timestamp::now() + SignedDuration::from_hours(24)),
            ..CouponUpdate::from(&coupon)
        };

        ctx.coupons.update_coupon("LATER", update).await?;

        let result = ctx.coupons.validate_coupon("LATER", None).await;

        assert!(
            matches!(result, Err(CouponsServiceError::OutOfWindow)),
            "expected OutOfWindow, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_unknown_coupon_returns_not_found() {
        let ctx = TestContext::new().await;

        let update = CouponUpdate {
            status: CouponStatus::Disabled,
            usage_limit: None,
            per_user_limit: None,
            starts_at: None,
            ends_at: None,
        };

        let result = ctx.coupons.update_coupon("MISSING", update).await;

        assert!(
            matches!(result, Err(CouponsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_coupon_rejects_reversed_window() -> TestResult {
        let ctx = TestContext::new().await;

        let coupon = ctx
            .coupons
            .create_coupon(helpers::amount_coupon("BACKWARDS", 100))
            .await?;

        let now = Timestamp::now();
        let update = CouponUpdate {
            starts_at: Some(now),
            ends_at: Some(now - SignedDuration::from_hours(1)),
            ..CouponUpdate::from(&coupon)
        };

        let result = ctx.coupons.update_coupon("BACKWARDS", update).await;

        assert!(
            matches!(result, Err(CouponsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_coupons_returns_coupons_with_rules_by_code() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.coupons
            .create_coupon(helpers::amount_coupon("ZETA", 100))
            .await?;
        ctx.coupons
            .create_coupon(helpers::amount_coupon("ALPHA", 200))
            .await?;

        let coupons = ctx.coupons.list_coupons().await?;

        let codes: Vec<&str> = coupons.iter().map(|coupon| coupon.code.as_str()).collect();

        assert_eq!(codes, vec!["ALPHA", "ZETA"]);
        assert!(coupons.iter().all(|coupon| coupon.rules.len() == 1));

        Ok(())
    }

    #[tokio::test]
    async fn replace_rules_swaps_scope() -> TestResult {
        let ctx = TestContext::new().await;
        let category = Uuid::now_v7();

        ctx.coupons
            .create_coupon(helpers::amount_coupon("SCOPED", 500))
            .await?;

        let rules = vec![CouponRuleRecord::scoped(Scope::Category(category))];

        let coupon = ctx.coupons.replace_rules("scoped", rules.clone()).await?;

        assert_eq!(coupon.rules, rules);
        assert_eq!(ctx.coupons.get_coupon("SCOPED").await?.rules, rules);

        let application = ctx
            .coupons
            .apply_coupon(apply(
                "SCOPED",
                "TRY",
                vec![item(Uuid::now_v7(), 1_000, 1), item(category, 2_000, 1)],
            ))
            .await?;

        assert_eq!(application.eligible_lines, vec![1]);
        assert_eq!(application.eligible_subtotal, 2_000);

        Ok(())
    }

    #[tokio::test]
    async fn replace_rules_rejects_empty_and_keeps_existing() -> TestResult {
        let ctx = TestContext::new().await;

        let coupon = ctx
            .coupons
            .create_coupon(helpers::amount_coupon("KEEP", 100))
            .await?;

        let result = ctx.coupons.replace_rules("KEEP", Vec::new()).await;

        assert!(
            matches!(result, Err(CouponsServiceError::MissingRequiredData)),
            "expected MissingRequiredData, got {result:?}"
        );
        assert_eq!(ctx.coupons.get_coupon("KEEP").await?.rules, coupon.rules);

        Ok(())
    }

    #[tokio::test]
    async fn replace_rules_on_bogo_coupon_requires_buy_get_terms() -> TestResult {
        let ctx = TestContext::new().await;

        let mut rule = CouponRuleRecord::scoped(Scope::Global);
        rule.buy_get = Some(BuyGetTerms {
            buy: NonZeroU32::MIN,
            get: NonZeroU32::MIN,
            target: BuyGetTarget::SameProduct,
        });

        let mut coupon = helpers::amount_coupon("B2", 0);
        coupon.discount = CouponDiscount::BuyGet;
        coupon.rules = vec![rule];

        ctx.coupons.create_coupon(coupon).await?;

        let result = ctx
            .coupons
            .replace_rules("B2", vec![CouponRuleRecord::scoped(Scope::Global)])
            .await;

        assert!(
            matches!(result, Err(CouponsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn apply_amount_coupon_is_limited_to_subtotal() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.coupons
            .create_coupon(helpers::amount_coupon("TENOFF", 10_000))
            .await?;

        let application = ctx
            .coupons
            .apply_coupon(apply("tenoff", "TRY", vec![item(Uuid::now_v7(), 8_000, 1)]))
            .await?;

        assert_eq!(application.code, "TENOFF");
        assert_eq!(application.currency, "TRY");
        assert_eq!(application.discount, 8_000);
        assert_eq!(application.eligible_lines, vec![0]);

        Ok(())
    }

    #[tokio::test]
    async fn apply_converts_coupon_amounts_into_cart_currency() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.rates.set_rate("USD", Decimal::new(25, 3)).await?;

        let mut coupon = helpers::amount_coupon("PCT", 0);
        coupon.discount = CouponDiscount::Percent {
            basis_points: 5_000,
            max_discount: Some(20_000),
        };

        ctx.coupons.create_coupon(coupon).await?;

        let application = ctx
            .coupons
            .apply_coupon(apply("PCT", "USD", vec![item(Uuid::now_v7(), 10_000, 1)]))
            .await?;

        // 200.00 TRY cap is 5.00 USD
        assert_eq!(application.discount, 500);
        assert!(application.capped);

        Ok(())
    }

    #[tokio::test]
    async fn apply_without_rate_for_cart_currency_fails() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.coupons
            .create_coupon(helpers::amount_coupon("FLAT", 100))
            .await?;

        let result = ctx
            .coupons
            .apply_coupon(apply("FLAT", "EUR", vec![item(Uuid::now_v7(), 1_000, 1)]))
            .await;

        assert!(
            matches!(
                result,
                Err(CouponsServiceError::Rates(RateError::MissingRate("EUR")))
            ),
            "expected MissingRate, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn apply_bogo_coupon_reports_free_units() -> TestResult {
        let ctx = TestContext::new().await;
        let category = Uuid::now_v7();

        let mut rule = CouponRuleRecord::scoped(Scope::Category(category));
        rule.buy_get = Some(BuyGetTerms {
            buy: NonZeroU32::MIN,
            get: NonZeroU32::MIN,
            target: BuyGetTarget::SameCategory,
        });

        let mut coupon = helpers::amount_coupon("B1G1", 0);
        coupon.discount = CouponDiscount::BuyGet;
        coupon.rules = vec![rule];

        ctx.coupons.create_coupon(coupon).await?;

        let application = ctx
            .coupons
            .apply_coupon(apply(
                "B1G1",
                "TRY",
                vec![
                    item(category, 3_000, 1),
                    item(category, 2_000, 1),
                    item(category, 1_000, 1),
                ],
            ))
            .await?;

        assert_eq!(application.discount, 1_000);
        assert_eq!(
            application.free_units,
            vec![FreeUnitsBreakdown {
                line: 2,
                units: 1,
                amount: 1_000
            }]
        );

        Ok(())
    }

    #[tokio::test]
    async fn apply_second_coupon_is_not_allowed() {
        let ctx = TestContext::new().await;

        let mut request = apply("SECOND", "TRY", vec![item(Uuid::now_v7(), 1_000, 1)]);
        request.applied_coupon = Some("FIRST".to_string());

        let result = ctx.coupons.apply_coupon(request).await;

        assert!(
            matches!(result, Err(CouponsServiceError::StackingNotAllowed)),
            "expected StackingNotAllowed, got {result:?}"
        );
    }

    #[tokio::test]
    async fn reapplying_the_same_coupon_is_allowed() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.coupons
            .create_coupon(helpers::amount_coupon("SAME", 100))
            .await?;

        let mut request = apply("same", "TRY", vec![item(Uuid::now_v7(), 1_000, 1)]);
        request.applied_coupon = Some("SAME".to_string());

        assert_eq!(ctx.coupons.apply_coupon(request).await?.discount, 100);

        Ok(())
    }

    #[test]
    fn coupon_uuid_is_typed() {
        let uuid = CouponUuid::new();

        assert_eq!(CouponUuid::from_uuid(uuid.into_uuid()), uuid);
    }
}
