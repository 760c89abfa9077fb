use clap::Args;
use vitrine_app::domain::coupons::{CouponsService, PgCouponsService, records::CouponRecord};

#[derive(Debug, Args)]
pub(crate) struct ListCouponsArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

fn summary(coupon: &CouponRecord) -> String {
    let usage_limit = coupon
        .usage_limit
        .map_or_else(|| "unlimited".to_string(), |value| value.to_string());

    format!(
        "{}\t{}\t{}\trules={}\tusage_limit={usage_limit}",
        coupon.code,
        coupon.status.as_str(),
        coupon.discount.type_as_str(),
        coupon.rules.len(),
    )
}

pub(crate) async fn run(args: ListCouponsArgs) -> Result<(), String> {
    let db = crate::cli::connect(&args.database_url).await?;

    let coupons = PgCouponsService::new(db)
        .list_coupons()
        .await
        .map_err(|error| format!("failed to list coupons: {error}"))?;

    if coupons.is_empty() {
        println!("no coupons");
    }

    for coupon in &coupons {
        println!("{}", summary(coupon));
    }

    Ok(())
}
