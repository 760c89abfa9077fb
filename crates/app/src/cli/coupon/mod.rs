use clap::{Args, Subcommand};

mod check;
mod create;
mod disable;
mod list;

#[derive(Debug, Args)]
pub(crate) struct CouponCommand {
    #[command(subcommand)]
    command: CouponSubcommand,
}

#[derive(Debug, Subcommand)]
enum CouponSubcommand {
    Create(create::CreateCouponArgs),
    Check(check::CheckCouponArgs),
    Disable(disable::DisableCouponArgs),
    List(list::ListCouponsArgs),
}

pub(crate) async fn run(command: CouponCommand) -> Result<(), String> {
    match command.command {
        CouponSubcommand::Create(args) => create::run(args).await,
        CouponSubcommand::Check(args) => check::run(args).await,
        CouponSubcommand::Disable(args) => disable::run(args).await,
        CouponSubcommand::List(args) => list::run(args).await,
    }
}
