//! Coupons Repository

use std::num::NonZeroU32;

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;
use vitrine::coupons::Scope;

use crate::domain::{
    coupons::{
        data::{CouponUpdate, NewCoupon},
        eligibility::CouponUsage,
        records::{
            BuyGetTerms, CouponDiscount, CouponRecord, CouponRedemptionRecord,
            CouponRedemptionUuid, CouponRuleRecord, CouponRuleUuid, CouponStatus, CouponUuid,
            target_as_str, target_from_str,
        },
    },
    orders::records::OrderUuid,
    users::UserUuid,
};

const CREATE_COUPON_SQL: &str = include_str!("sql/create_coupon.sql");
const CREATE_COUPON_RULE_SQL: &str = include_str!("sql/create_coupon_rule.sql");
const GET_COUPON_BY_CODE_SQL: &str = include_str!("sql/get_coupon_by_code.sql");
const UPDATE_COUPON_SQL: &str = include_str!("sql/update_coupon.sql");
const LIST_COUPONS_SQL: &str = include_str!("sql/list_coupons.sql");
const DELETE_COUPON_RULES_SQL: &str = include_str!("sql/delete_coupon_rules.sql");
const LIST_COUPON_RULES_SQL: &str = include_str!("sql/list_coupon_rules.sql");
const COUNT_REDEMPTIONS_SQL: &str = include_str!("sql/count_redemptions.sql");
const CREATE_REDEMPTION_SQL: &str = include_str!("sql/create_redemption.sql");
const LIST_ORDER_REDEMPTIONS_SQL: &str = include_str!("sql/list_order_redemptions.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCouponsRepository;

impl PgCouponsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: &NewCoupon,
    ) -> Result<CouponRecord, sqlx::Error> {
        let (amount_fixed, basis_points, max_discount) = match coupon.discount {
            CouponDiscount::Amount { amount_fixed } => (Some(amount_fixed), None, None),
            CouponDiscount::Percent {
                basis_points,
                max_discount,
            } => (None, Some(basis_points), max_discount),
            CouponDiscount::BuyGet => (None, None, None),
        };

        query_as::<Postgres, CouponRecord>(CREATE_COUPON_SQL)
            .bind(coupon.uuid.into_uuid())
            .bind(&coupon.code)
            .bind(coupon.status.as_str())
            .bind(coupon.discount.type_as_str())
            .bind(amount_fixed.map(to_i64).transpose()?)
            .bind(basis_points.map(i32::from))
            .bind(max_discount.map(to_i64).transpose()?)
            .bind(coupon.usage_limit.map(to_i32).transpose()?)
            .bind(coupon.per_user_limit.map(to_i32).transpose()?)
            .bind(coupon.starts_at.map(SqlxTimestamp::from))
            .bind(coupon.ends_at.map(SqlxTimestamp::from))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_rule(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
        rule: &CouponRuleRecord,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_COUPON_RULE_SQL)
            .bind(rule.uuid.into_uuid())
            .bind(coupon.into_uuid())
            .bind(rule.scope_type_as_str())
            .bind(rule.scope_value())
            .bind(rule.min_quantity.map(to_i32).transpose()?)
            .bind(rule.min_subtotal.map(to_i64).transpose()?)
            .bind(rule.buy_get.map(|t| to_i32(t.buy.get())).transpose()?)
            .bind(rule.buy_get.map(|t| to_i32(t.get.get())).transpose()?)
            .bind(rule.buy_get.map(|t| target_as_str(t.target)))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Load a coupon and its rules by normalised code.
    pub(crate) async fn get_coupon_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<CouponRecord, sqlx::Error> {
        let mut coupon = query_as::<Postgres, CouponRecord>(GET_COUPON_BY_CODE_SQL)
            .bind(code)
            .fetch_one(&mut **tx)
            .await?;

        coupon.rules = self.list_rules(tx, coupon.uuid).await?;

        Ok(coupon)
    }

    pub(crate) async fn list_coupons(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<CouponRecord>, sqlx::Error> {
        let mut coupons = query_as::<Postgres, CouponRecord>(LIST_COUPONS_SQL)
            .fetch_all(&mut **tx)
            .await?;

        for coupon in &mut coupons {
            coupon.rules = self.list_rules(tx, coupon.uuid).await?;
        }

        Ok(coupons)
    }

    pub(crate) async fn update_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
        update: &CouponUpdate,
    ) -> Result<CouponRecord, sqlx::Error> {
        let mut coupon = query_as::<Postgres, CouponRecord>(UPDATE_COUPON_SQL)
            .bind(code)
            .bind(update.status.as_str())
            .bind(update.usage_limit.map(to_i32).transpose()?)
            .bind(update.per_user_limit.map(to_i32).transpose()?)
            .bind(update.starts_at.map(SqlxTimestamp::from))
            .bind(update.ends_at.map(SqlxTimestamp::from))
            .fetch_one(&mut **tx)
            .await?;

        coupon.rules = self.list_rules(tx, coupon.uuid).await?;

        Ok(coupon)
    }

    pub(crate) async fn delete_rules(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
    ) -> Result<u64, sqlx::Error> {
        let result = query(DELETE_COUPON_RULES_SQL)
            .bind(coupon.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }

    pub(crate) async fn list_rules(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
    ) -> Result<Vec<CouponRuleRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRuleRecord>(LIST_COUPON_RULES_SQL)
            .bind(coupon.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Redemption counts, derived from the redemption rows themselves.
    pub(crate) async fn count_redemptions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
        user: Option<UserUuid>,
    ) -> Result<CouponUsage, sqlx::Error> {
        let (total, by_user): (i64, i64) = query_as(COUNT_REDEMPTIONS_SQL)
            .bind(coupon.into_uuid())
            .bind(user.map(UserUuid::into_uuid))
            .fetch_one(&mut **tx)
            .await?;

        Ok(CouponUsage {
            total: u64::try_from(total).unwrap_or_default(),
            by_user: user.map(|_| u64::try_from(by_user).unwrap_or_default()),
        })
    }

    /// Record a redemption. Returns `None` when the order already redeemed this coupon.
    pub(crate) async fn create_redemption(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
        user: Option<UserUuid>,
        order: OrderUuid,
        discount_applied: i64,
    ) -> Result<Option<CouponRedemptionRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRedemptionRecord>(CREATE_REDEMPTION_SQL)
            .bind(CouponRedemptionUuid::new().into_uuid())
            .bind(coupon.into_uuid())
            .bind(user.map(UserUuid::into_uuid))
            .bind(order.into_uuid())
            .bind(discount_applied)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_order_redemptions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<CouponRedemptionRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRedemptionRecord>(LIST_ORDER_REDEMPTIONS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

fn to_i64(value: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(value).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

fn to_i32(value: u32) -> Result<i32, sqlx::Error> {
    i32::try_from(value).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

fn decode_error(index: &str, message: String) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: index.to_string(),
        source: message.into(),
    }
}

fn unsigned<T: TryFrom<i64>>(index: &str, value: Option<i64>) -> sqlx::Result<Option<T>> {
    value
        .map(|value| {
            T::try_from(value)
                .map_err(|_negative| decode_error(index, format!("{value} is out of range")))
        })
        .transpose()
}

impl<'r> FromRow<'r, PgRow> for CouponRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;
        let status = CouponStatus::try_from(status.as_str())
            .map_err(|message| decode_error("status", message))?;

        let discount_type: String = row.try_get("discount_type")?;
        let amount_fixed = unsigned::<u64>("amount_fixed", row.try_get("amount_fixed")?)?;
        let basis_points = unsigned::<u16>(
            "percent_basis_points",
            row.try_get::<Option<i32>, _>("percent_basis_points")?
                .map(i64::from),
        )?;
        let max_discount = unsigned::<u64>("max_discount", row.try_get("max_discount")?)?;

        let discount = match (discount_type.as_str(), amount_fixed, basis_points) {
            ("amount", Some(amount_fixed), _) => CouponDiscount::Amount { amount_fixed },
            ("percent", _, Some(basis_points)) => CouponDiscount::Percent {
                basis_points,
                max_discount,
            },
            ("bogo", _, _) => CouponDiscount::BuyGet,
            (other, _, _) => {
                return Err(decode_error(
                    "discount_type",
                    format!("incomplete '{other}' discount"),
                ));
            }
        };

        Ok(Self {
            uuid: CouponUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            status,
            discount,
            usage_limit: unsigned(
                "usage_limit",
                row.try_get::<Option<i32>, _>("usage_limit")?.map(i64::from),
            )?,
            per_user_limit: unsigned(
                "per_user_limit",
                row.try_get::<Option<i32>, _>("per_user_limit")?
                    .map(i64::from),
            )?,
            starts_at: row
                .try_get::<Option<SqlxTimestamp>, _>("starts_at")?
                .map(SqlxTimestamp::to_jiff),
            ends_at: row
                .try_get::<Option<SqlxTimestamp>, _>("ends_at")?
                .map(SqlxTimestamp::to_jiff),
            rules: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CouponRuleRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let scope_type: String = row.try_get("scope_type")?;
        let scope_value: Option<Uuid> = row.try_get("scope_value_uuid")?;

        let scope = match (scope_type.as_str(), scope_value) {
            ("global", None) => Scope::Global,
            ("category", Some(category)) => Scope::Category(category),
            ("product", Some(product)) => Scope::Product(product),
            (other, _) => {
                return Err(decode_error(
                    "scope_type",
                    format!("inconsistent '{other}' scope"),
                ));
            }
        };

        let buy = row.try_get::<Option<i32>, _>("bogo_buy_quantity")?;
        let get = row.try_get::<Option<i32>, _>("bogo_get_quantity")?;
        let target = row.try_get::<Option<String>, _>("bogo_target_scope")?;

        let buy_get = match (buy, get, target) {
            (Some(buy), Some(get), Some(target)) => Some(BuyGetTerms {
                buy: positive("bogo_buy_quantity", buy)?,
                get: positive("bogo_get_quantity", get)?,
                target: target_from_str(&target).ok_or_else(|| {
                    decode_error("bogo_target_scope", format!("unknown target '{target}'"))
                })?,
            }),
            _ => None,
        };

        Ok(Self {
            uuid: CouponRuleUuid::from_uuid(row.try_get("uuid")?),
            scope,
            min_quantity: unsigned(
                "min_quantity",
                row.try_get::<Option<i32>, _>("min_quantity")?
                    .map(i64::from),
            )?,
            min_subtotal: unsigned("min_subtotal", row.try_get("min_subtotal")?)?,
            buy_get,
        })
    }
}

fn positive(index: &str, value: i32) -> sqlx::Result<NonZeroU32> {
    u32::try_from(value)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| decode_error(index, format!("{value} is not positive")))
}

impl<'r> FromRow<'r, PgRow> for CouponRedemptionRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let discount_applied: i64 = row.try_get("discount_applied")?;

        Ok(Self {
            uuid: CouponRedemptionUuid::from_uuid(row.try_get("uuid")?),
            coupon_uuid: CouponUuid::from_uuid(row.try_get("coupon_uuid")?),
            user_uuid: row
                .try_get::<Option<Uuid>, _>("user_uuid")?
                .map(UserUuid::from_uuid),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            discount_applied: u64::try_from(discount_applied).map_err(|e| {
                sqlx::Error::ColumnDecode {
                    index: "discount_applied".to_string(),
                    source: Box::new(e),
                }
            })?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
