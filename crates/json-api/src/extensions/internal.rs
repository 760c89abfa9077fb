//! Unexpected handler failures.

use std::fmt::Display;

use salvo::prelude::StatusError;
use tracing::error;

pub(crate) trait InternalErrorExt<T> {
    /// Log the error against `operation` and answer 500 without exposing it to the client.
    fn or_internal(self, operation: &'static str) -> Result<T, StatusError>;
}

impl<T, E: Display> InternalErrorExt<T> for Result<T, E> {
    fn or_internal(self, operation: &'static str) -> Result<T, StatusError> {
        self.map_err(|error| {
            error!(operation, error = %error, "request failed unexpectedly");

            StatusError::internal_server_error().brief("Internal server error")
        })
    }
}
