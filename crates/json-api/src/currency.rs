//! Currency Handler

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::error;

use vitrine_app::domain::rates::{RatesServiceError, records::RateTable};

use crate::extensions::*;

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub(crate) struct RateResponse {
    /// ISO-4217 code of the quoted currency
    pub code: String,

    /// Units of `code` per unit of the base currency, as a decimal string
    pub rate: String,
}

/// Currency Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CurrencyResponse {
    pub base_currency: String,
    pub rates: Vec<RateResponse>,
}

impl From<RateTable> for CurrencyResponse {
    fn from(table: RateTable) -> Self {
        CurrencyResponse {
            base_currency: table.base_currency,
            rates: table
                .rates
                .into_iter()
                .map(|record| RateResponse {
                    code: record.currency,
                    rate: record.rate.normalize().to_string(),
                })
                .collect(),
        }
    }
}

/// Currency Handler
///
/// Returns the base currency and the exchange rates from it.
#[endpoint(tags("currency"), summary = "Base currency and exchange rates")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CurrencyResponse>, StatusError> {
    let state = depot.app_state()?;

    match state.app.rates.get_rates().await {
        Ok(table) => Ok(Json(table.into())),
        Err(RatesServiceError::NotConfigured) => {
            error!("base currency is not configured");

            Err(StatusError::service_unavailable().brief("Base currency is not configured"))
        }
        Err(other) => Err(other).or_internal("load exchange rates"),
    }
}
