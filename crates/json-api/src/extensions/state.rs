//! Shared state lookup for handlers.

use std::sync::Arc;

use salvo::prelude::{Depot, StatusError};
use tracing::error;

use crate::state::State;

pub(crate) trait StateExt {
    /// The [`State`] injected by the router. A router built without it answers 500.
    fn app_state(&self) -> Result<Arc<State>, StatusError>;
}

impl StateExt for Depot {
    fn app_state(&self) -> Result<Arc<State>, StatusError> {
        self.obtain::<Arc<State>>().cloned().map_err(|_missing| {
            error!("application state was not injected into the depot");

            StatusError::internal_server_error().brief("Service is misconfigured")
        })
    }
}
