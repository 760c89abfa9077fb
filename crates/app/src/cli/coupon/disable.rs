use clap::Args;
use vitrine_app::domain::coupons::{
    CouponsService, PgCouponsService,
    data::CouponUpdate,
    records::CouponStatus,
};

#[derive(Debug, Args)]
pub(crate) struct DisableCouponArgs {
    /// Coupon code to disable
    code: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: DisableCouponArgs) -> Result<(), String> {
    let db = crate::cli::connect(&args.database_url).await?;
    let coupons = PgCouponsService::new(db);

    let coupon = coupons
        .get_coupon(&args.code)
        .await
        .map_err(|error| format!("failed to load coupon {}: {error}", args.code.trim()))?;

    let update = CouponUpdate {
        status: CouponStatus::Disabled,
        ..CouponUpdate::from(&coupon)
    };

    let coupon = coupons
        .update_coupon(&coupon.code, update)
        .await
        .map_err(|error| format!("failed to disable coupon {}: {error}", coupon.code))?;

    println!("coupon_uuid: {}", coupon.uuid);
    println!("code: {}", coupon.code);
    println!("status: {}", coupon.status.as_str());

    Ok(())
}
