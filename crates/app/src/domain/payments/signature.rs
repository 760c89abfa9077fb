//! Webhook signatures
//!
//! Deliveries carry a `Stripe-Signature` header of the form `t=<unix seconds>,v1=<hex>`, where
//! each `v1` value is an HMAC-SHA256 of `"{t}.{payload}"` keyed with the endpoint secret. Several
//! `v1` values may be present while a secret is being rolled.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use hmac::{Hmac, Mac};
use jiff::{SignedDuration, Timestamp};
use sha2::Sha256;

use crate::domain::payments::errors::PaymentEventError;

/// Default allowed clock difference between the gateway and this service.
pub const DEFAULT_TOLERANCE: SignedDuration = SignedDuration::from_secs(300);

#[derive(Clone)]
pub struct WebhookVerifier {
    secret: String,
    tolerance: SignedDuration,
}

impl Debug for WebhookVerifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"<redacted>")
            .field("tolerance", &self.tolerance)
            .finish()
    }
}

impl WebhookVerifier {
    #[must_use]
    pub fn new(secret: impl Into<String>, tolerance: SignedDuration) -> Self {
        Self {
            secret: secret.into(),
            tolerance: tolerance.abs(),
        }
    }

    /// Check that `payload` was signed by the gateway no more than the tolerance away from `now`.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentEventError::AuthenticityFailed`] when the header is malformed, no
    /// signature matches, or the signing time is outside the tolerance.
    pub fn verify(
        &self,
        payload: &[u8],
        header: &str,
        now: Timestamp,
    ) -> Result<(), PaymentEventError> {
        let mut timestamp = None;
        let mut signatures = Vec::new();

        for part in header.split(',').map(str::trim) {
            if let Some(value) = part.strip_prefix("t=") {
                timestamp = Some(value);
            } else if let Some(value) = part.strip_prefix("v1=") {
                signatures.push(value);
            }
        }

        let Some(timestamp) = timestamp.filter(|_| !signatures.is_empty()) else {
            return Err(failed("signature header is incomplete"));
        };

        let signed_at = timestamp
            .parse::<i64>()
            .map_err(|_invalid| failed("signature timestamp is invalid"))?;

        let mac = self.mac(timestamp, payload)?;

        let matched = signatures.iter().any(|signature| {
            hex::decode(signature).is_ok_and(|bytes| mac.clone().verify_slice(&bytes).is_ok())
        });

        if !matched {
            return Err(failed("signature mismatch"));
        }

        if now.as_second().abs_diff(signed_at) > self.tolerance.as_secs().unsigned_abs() {
            return Err(failed("signature timestamp outside tolerance"));
        }

        Ok(())
    }

    /// Build a header for `payload` signed at `at`, as the gateway would.
    pub fn sign(&self, payload: &[u8], at: Timestamp) -> Result<String, PaymentEventError> {
        let timestamp = at.as_second().to_string();
        let signature = hex::encode(self.mac(&timestamp, payload)?.finalize().into_bytes());

        Ok(format!("t={timestamp},v1={signature}"))
    }

    fn mac(&self, timestamp: &str, payload: &[u8]) -> Result<Hmac<Sha256>, PaymentEventError> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.as_bytes())
            .map_err(|_invalid| failed("webhook secret is unusable"))?;

        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);

        Ok(mac)
    }
}

const fn failed(reason: &'static str) -> PaymentEventError {
    PaymentEventError::AuthenticityFailed { reason }
}
