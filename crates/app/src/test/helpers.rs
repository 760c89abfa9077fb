//! Test Helpers

use testresult::TestResult;
use uuid::Uuid;
use vitrine::coupons::Scope;

use crate::{
    domain::{
        coupons::{
            PgCouponsRepository,
            data::NewCoupon,
            records::{
                CouponDiscount, CouponRedemptionRecord, CouponRuleRecord, CouponStatus, CouponUuid,
            },
        },
        orders::{
            OrdersService,
            data::{NewOrder, NewOrderItem},
            records::{OrderItemUuid, OrderUuid},
        },
        products::{
            ProductsService, ProductsServiceError,
            data::NewProduct,
            records::{ProductRecord, ProductUuid},
        },
        users::UserUuid,
    },
    test::TestContext,
};

/// An active, unlimited, always-valid coupon taking `amount` minor units off the whole cart.
pub(crate) fn amount_coupon(code: &str, amount: u64) -> NewCoupon {
    NewCoupon {
        uuid: CouponUuid::new(),
        code: code.to_string(),
        status: CouponStatus::Active,
        discount: CouponDiscount::Amount {
            amount_fixed: amount,
        },
        usage_limit: None,
        per_user_limit: None,
        starts_at: None,
        ends_at: None,
        rules: vec![CouponRuleRecord::scoped(Scope::Global)],
    }
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    price: u64,
    stock: u32,
) -> Result<ProductRecord, ProductsServiceError> {
    ctx.products
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            category_uuid: Uuid::now_v7(),
            price,
            stock,
        })
        .await
}

/// An anonymous TRY order for `(product, quantity, unit price)` lines, totalled at list price.
pub(crate) fn new_order(lines: &[(ProductUuid, u32, u64)]) -> NewOrder {
    NewOrder {
        uuid: OrderUuid::new(),
        user_uuid: None,
        currency: "TRY".to_string(),
        total: lines
            .iter()
            .map(|(_, quantity, price)| u64::from(*quantity) * price)
            .sum(),
        items: lines
            .iter()
            .map(|&(product_uuid, quantity, price)| NewOrderItem {
                uuid: OrderItemUuid::new(),
                product_uuid,
                quantity,
                price,
            })
            .collect(),
    }
}

/// Record a redemption of `coupon` against a fresh order placed by `user`.
pub(crate) async fn redeem(
    ctx: &TestContext,
    coupon: CouponUuid,
    user: Option<UserUuid>,
    discount: i64,
) -> TestResult {
    let product = create_product(ctx, 1_000, 1).await?;

    let mut order = new_order(&[(product.uuid, 1, 1_000)]);
    order.user_uuid = user;

    let order = ctx.orders.create_order(order).await?;

    let mut tx = ctx.app_db.begin().await?;

    PgCouponsRepository::new()
        .create_redemption(&mut tx, coupon, user, order.uuid, discount)
        .await?
        .ok_or("redemption was not recorded")?;

    tx.commit().await?;

    Ok(())
}

pub(crate) async fn order_redemptions(
    ctx: &TestContext,
    order: OrderUuid,
) -> Result<Vec<CouponRedemptionRecord>, sqlx::Error> {
    let mut tx = ctx.app_db.begin().await?;

    let redemptions = PgCouponsRepository::new()
        .list_order_redemptions(&mut tx, order)
        .await?;

    tx.commit().await?;

    Ok(redemptions)
}
