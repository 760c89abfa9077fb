//! Payment gateway events
//!
//! Authenticates webhook deliveries and turns them into payment confirmations for settlement.

pub mod errors;
pub mod events;
pub mod signature;

pub use errors::PaymentEventError;
pub use events::{PaymentEvent, parse_event};
pub use signature::WebhookVerifier;
