//! Payment event errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentEventError {
    #[error("webhook authenticity check failed: {reason}")]
    AuthenticityFailed { reason: &'static str },

    #[error("malformed payment event: {reason}")]
    Malformed { reason: String },
}

impl PaymentEventError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for PaymentEventError {
    fn from(error: serde_json::Error) -> Self {
        Self::malformed(error.to_string())
    }
}
