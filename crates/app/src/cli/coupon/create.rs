use std::num::NonZeroU32;

use clap::{Args, ValueEnum};
use jiff::Timestamp;
use uuid::Uuid;
use vitrine::coupons::{BuyGetTarget, Scope};
use vitrine_app::domain::coupons::{
    CouponsService, PgCouponsService,
    data::NewCoupon,
    records::{BuyGetTerms, CouponDiscount, CouponRuleRecord, CouponStatus, CouponUuid},
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DiscountType {
    Amount,
    Percent,
    Bogo,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Target {
    SameCategory,
    SameProduct,
}

#[derive(Debug, Args)]
pub(crate) struct CreateCouponArgs {
    /// Code customers enter; stored trimmed and upper-cased
    #[arg(long)]
    code: String,

    #[arg(long = "type", value_enum)]
    discount_type: DiscountType,

    /// Fixed amount off, in minor units of the base currency
    #[arg(long, required_if_eq("discount_type", "amount"))]
    amount: Option<u64>,

    /// Percentage off in basis points (10000 = 100%)
    #[arg(long, required_if_eq("discount_type", "percent"))]
    basis_points: Option<u16>,

    /// Largest discount a percentage coupon grants, in minor units of the base currency
    #[arg(long)]
    max_discount: Option<u64>,

    /// Rule scopes: `global`, `category:<uuid>` or `product:<uuid>`
    #[arg(long = "scope", value_parser = parse_scope, default_value = "global")]
    scopes: Vec<Scope>,

    /// Minimum eligible quantity for every rule
    #[arg(long)]
    min_quantity: Option<u32>,

    /// Minimum eligible subtotal for every rule, in minor units of the base currency
    #[arg(long)]
    min_subtotal: Option<u64>,

    /// Units to buy for each free block (BOGO)
    #[arg(long, default_value = "1")]
    buy: NonZeroU32,

    /// Units made free for each block (BOGO)
    #[arg(long, default_value = "1")]
    get: NonZeroU32,

    /// How units are grouped into blocks (BOGO)
    #[arg(long, value_enum, default_value = "same-product")]
    target: Target,

    #[arg(long)]
    usage_limit: Option<u32>,

    #[arg(long)]
    per_user_limit: Option<u32>,

    /// Start of the validity window, e.g. 2026-01-01T00:00:00Z
    #[arg(long)]
    starts_at: Option<Timestamp>,

    /// End of the validity window, inclusive
    #[arg(long)]
    ends_at: Option<Timestamp>,

    /// Create the coupon disabled
    #[arg(long)]
    disabled: bool,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

fn parse_scope(value: &str) -> Result<Scope, String> {
    let parse_uuid = |uuid: &str| {
        Uuid::parse_str(uuid).map_err(|error| format!("invalid scope uuid '{uuid}': {error}"))
    };

    match value.split_once(':') {
        None if value.eq_ignore_ascii_case("global") => Ok(Scope::Global),
        Some(("category", uuid)) => parse_uuid(uuid).map(Scope::Category),
        Some(("product", uuid)) => parse_uuid(uuid).map(Scope::Product),
        _ => Err(format!(
            "invalid scope '{value}', expected global, category:<uuid> or product:<uuid>"
        )),
    }
}

impl CreateCouponArgs {
    fn discount(&self) -> Result<CouponDiscount, String> {
        match self.discount_type {
            DiscountType::Amount => Ok(CouponDiscount::Amount {
                amount_fixed: self.amount.ok_or("--amount is required")?,
            }),
            DiscountType::Percent => Ok(CouponDiscount::Percent {
                basis_points: self.basis_points.ok_or("--basis-points is required")?,
                max_discount: self.max_discount,
            }),
            DiscountType::Bogo => Ok(CouponDiscount::BuyGet),
        }
    }

    fn rules(&self) -> Vec<CouponRuleRecord> {
        let buy_get = matches!(self.discount_type, DiscountType::Bogo).then_some(BuyGetTerms {
            buy: self.buy,
            get: self.get,
            target: match self.target {
                Target::SameCategory => BuyGetTarget::SameCategory,
                Target::SameProduct => BuyGetTarget::SameProduct,
            },
        });

        self.scopes
            .iter()
            .map(|scope| CouponRuleRecord {
                min_quantity: self.min_quantity,
                min_subtotal: self.min_subtotal,
                buy_get,
                ..CouponRuleRecord::scoped(*scope)
            })
            .collect()
    }
}

pub(crate) async fn run(args: CreateCouponArgs) -> Result<(), String> {
    let db = crate::cli::connect(&args.database_url).await?;

    let coupon = NewCoupon {
        uuid: CouponUuid::new(),
        code: args.code.clone(),
        status: if args.disabled {
            CouponStatus::Disabled
        } else {
            CouponStatus::Active
        },
        discount: args.discount()?,
        usage_limit: args.usage_limit,
        per_user_limit: args.per_user_limit,
        starts_at: args.starts_at,
        ends_at: args.ends_at,
        rules: args.rules(),
    };

    let coupon = PgCouponsService::new(db)
        .create_coupon(coupon)
        .await
        .map_err(|error| format!("failed to create coupon: {error}"))?;

    println!("coupon_uuid: {}", coupon.uuid);
    println!("code: {}", coupon.code);
    println!("type: {}", coupon.discount.type_as_str());
    println!("rules: {}", coupon.rules.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scopes() {
        let uuid = Uuid::now_v7();

        assert_eq!(parse_scope("global"), Ok(Scope::Global));
        assert_eq!(
            parse_scope(&format!("category:{uuid}")),
            Ok(Scope::Category(uuid))
        );
        assert_eq!(
            parse_scope(&format!("product:{uuid}")),
            Ok(Scope::Product(uuid))
        );
        assert!(parse_scope("brand:nike").is_err());
        assert!(parse_scope("product:nope").is_err());
    }
}
