//! Rates service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;
use vitrine::rates::RateError;

#[derive(Debug, Error)]
pub enum RatesServiceError {
    #[error("base currency is not configured")]
    NotConfigured,

    #[error("invalid exchange rate data")]
    InvalidData,

    #[error(transparent)]
    Rate(#[from] RateError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for RatesServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotConfigured;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}
