//! Settlement Config

use std::time::Duration;

use clap::Args;
use vitrine_app::domain::orders::SettlementSettings;

/// Bounds on each order settlement.
#[derive(Debug, Args)]
pub struct SettlementConfig {
    /// Statement and lock timeout for each settlement attempt, in milliseconds
    #[arg(long, env = "SETTLEMENT_STATEMENT_TIMEOUT_MS", default_value_t = 5_000_u64)]
    pub settlement_statement_timeout_ms: u64,

    /// Attempts before a transient store failure is reported
    #[arg(long, env = "SETTLEMENT_MAX_ATTEMPTS", default_value_t = 3_u32)]
    pub settlement_max_attempts: u32,

    /// Delay before the first retry, in milliseconds; doubled for each further retry
    #[arg(long, env = "SETTLEMENT_RETRY_BACKOFF_MS", default_value_t = 50_u64)]
    pub settlement_retry_backoff_ms: u64,
}

impl SettlementConfig {
    /// Settlement settings for the app context.
    #[must_use]
    pub fn settings(&self) -> SettlementSettings {
        SettlementSettings {
            statement_timeout: Duration::from_millis(self.settlement_statement_timeout_ms),
            max_attempts: self.settlement_max_attempts,
            retry_backoff: Duration::from_millis(self.settlement_retry_backoff_ms),
        }
    }
}
