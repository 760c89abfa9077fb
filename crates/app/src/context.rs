//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        coupons::{CouponsService, PgCouponsService},
        orders::{
            OrdersService, PgOrdersService, PgSettlementService, SettlementService,
            SettlementSettings,
        },
        products::{PgProductsService, ProductsService},
        rates::{PgRatesService, RatesService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub coupons: Arc<dyn CouponsService>,
    pub orders: Arc<dyn OrdersService>,
    pub settlement: Arc<dyn SettlementService>,
    pub products: Arc<dyn ProductsService>,
    pub rates: Arc<dyn RatesService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        max_connections: u32,
        settlement: SettlementSettings,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url, max_connections)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::from_db(&Db::new(pool), settlement))
    }

    /// Build application context over an existing pool.
    #[must_use]
    pub fn from_db(db: &Db, settlement: SettlementSettings) -> Self {
        Self {
            coupons: Arc::new(PgCouponsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone())),
            settlement: Arc::new(PgSettlementService::new(db.clone(), settlement)),
            products: Arc::new(PgProductsService::new(db.clone())),
            rates: Arc::new(PgRatesService::new(db.clone())),
        }
    }
}
