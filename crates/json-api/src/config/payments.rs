//! Payments Config

use clap::Args;
use jiff::SignedDuration;
use vitrine_app::domain::payments::WebhookVerifier;

/// Payment gateway webhook settings.
#[derive(Debug, Args)]
pub struct PaymentsConfig {
    /// Secret the gateway signs webhook deliveries with
    #[arg(long, env = "PAYMENT_WEBHOOK_SECRET", hide_env_values = true)]
    pub payment_webhook_secret: String,

    /// Largest accepted clock difference for signed deliveries, in seconds
    #[arg(long, env = "PAYMENT_WEBHOOK_TOLERANCE_SECONDS", default_value_t = 300_u32)]
    pub payment_webhook_tolerance_seconds: u32,
}

impl PaymentsConfig {
    /// Verifier for incoming webhook signatures.
    #[must_use]
    pub fn verifier(&self) -> WebhookVerifier {
        WebhookVerifier::new(
            self.payment_webhook_secret.clone(),
            SignedDuration::from_secs(i64::from(self.payment_webhook_tolerance_seconds)),
        )
    }
}
