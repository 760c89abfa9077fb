use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use vitrine_app::domain::rates::{PgRatesService, RatesService};

#[derive(Debug, Args)]
pub(crate) struct RateCommand {
    #[command(subcommand)]
    command: RateSubcommand,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    database_url: Option<String>,
}

#[derive(Debug, Subcommand)]
enum RateSubcommand {
    /// Show the base currency and every stored rate
    List,

    /// Set the rate from the base currency into a currency
    Set {
        /// ISO-4217 currency code
        currency: String,

        /// Units of `currency` per unit of the base currency
        rate: Decimal,
    },

    /// Change the base currency
    Base {
        /// ISO-4217 currency code
        currency: String,
    },
}

pub(crate) async fn run(command: RateCommand) -> Result<(), String> {
    let database_url = command
        .database_url
        .ok_or("--database-url or DATABASE_URL is required")?;

    let service = PgRatesService::new(crate::cli::connect(&database_url).await?);

    match command.command {
        RateSubcommand::List => {
            let table = service
                .get_rates()
                .await
                .map_err(|error| format!("failed to load rates: {error}"))?;

            println!("base_currency: {}", table.base_currency);

            for rate in table.rates {
                println!("{}: {}", rate.currency, rate.rate);
            }
        }
        RateSubcommand::Set { currency, rate } => {
            let record = service
                .set_rate(&currency, rate)
                .await
                .map_err(|error| format!("failed to set rate: {error}"))?;

            println!("{}: {}", record.currency, record.rate);
        }
        RateSubcommand::Base { currency } => {
            service
                .set_base_currency(&currency)
                .await
                .map_err(|error| format!("failed to set base currency: {error}"))?;

            println!("base_currency: {}", currency.trim().to_uppercase());
        }
    }

    Ok(())
}
