use clap::Args;
use uuid::Uuid;
use vitrine_app::domain::{
    coupons::{CouponsService, PgCouponsService, records::CouponDiscount},
    users::UserUuid,
};

#[derive(Debug, Args)]
pub(crate) struct CheckCouponArgs {
    /// Coupon code to check
    code: String,

    /// Also check the per-user limit for this user
    #[arg(long)]
    user_uuid: Option<Uuid>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CheckCouponArgs) -> Result<(), String> {
    let db = crate::cli::connect(&args.database_url).await?;

    let coupon = PgCouponsService::new(db)
        .validate_coupon(&args.code, args.user_uuid.map(UserUuid::from_uuid))
        .await
        .map_err(|error| format!("coupon {} cannot be used: {error}", args.code.trim()))?;

    println!("coupon_uuid: {}", coupon.uuid);
    println!("code: {}", coupon.code);
    println!("status: {}", coupon.status.as_str());

    match coupon.discount {
        CouponDiscount::Amount { amount_fixed } => println!("amount_off: {amount_fixed}"),
        CouponDiscount::Percent {
            basis_points,
            max_discount,
        } => {
            println!("basis_points: {basis_points}");
            println!(
                "max_discount: {}",
                max_discount.map_or_else(|| "none".to_string(), |value| value.to_string())
            );
        }
        CouponDiscount::BuyGet => println!("type: bogo"),
    }

    println!(
        "usage_limit: {}",
        coupon
            .usage_limit
            .map_or_else(|| "unlimited".to_string(), |value| value.to_string())
    );
    println!(
        "ends_at: {}",
        coupon
            .ends_at
            .map_or_else(|| "none".to_string(), |value| value.to_string())
    );
    println!("valid: yes");

    Ok(())
}
