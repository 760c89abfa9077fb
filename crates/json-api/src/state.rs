//! State

use std::sync::Arc;

use vitrine_app::{context::AppContext, domain::payments::WebhookVerifier};

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
    pub(crate) webhooks: WebhookVerifier,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, webhooks: WebhookVerifier) -> Self {
        Self { app, webhooks }
    }

    #[must_use]
    pub(crate) fn shared(app: AppContext, webhooks: WebhookVerifier) -> Arc<Self> {
        Arc::new(Self::new(app, webhooks))
    }
}
