use std::time::Duration;

use tracing::warn;

use crate::error::NotificationError;
use crate::sink::AlertSink;

/// How often, and how patiently, a failed delivery is retried
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RetryStrategy {
    /// Up to N attempts with no pause between them
    Immediate(u32),
    /// Up to N attempts, pausing `attempt * delay_ms` after each failure
    LinearBackoff(u32, u64),
}

impl RetryStrategy {
    /// Total number of attempts, never less than one
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Immediate(n) | Self::LinearBackoff(n, _) => (*n).max(1),
        }
    }

    /// Pause after the given failed attempt (1-based)
    pub fn delay(&self, attempt: u32) -> Option<Duration> {
        match self {
            Self::Immediate(_) => None,
            Self::LinearBackoff(_, delay_ms) => {
                Some(Duration::from_millis(delay_ms.saturating_mul(u64::from(attempt))))
            }
        }
    }
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::LinearBackoff(3, 500)
    }
}

/// Deliver a message, retrying transient failures
///
/// Permanent failures (4xx) are returned immediately. Otherwise the last
/// error is returned once all attempts are used.
pub async fn deliver_with_retry(
    sink: &dyn AlertSink,
    message: &str,
    strategy: &RetryStrategy,
) -> Result<(), NotificationError> {
    let attempts = strategy.attempts();
    let mut attempt = 1;

    loop {
        match sink.notify(message).await {
            Ok(()) => return Ok(()),
            Err(e) if e.is_permanent() || attempt >= attempts => return Err(e),
            Err(e) => {
                warn!(
                    sink = sink.name(),
                    attempt, attempts, "Alert delivery failed, retrying: {}", e
                );
                if let Some(delay) = strategy.delay(attempt) {
                    tokio::time::sleep(delay).await;
                }
                attempt += 1;
            }
        }
    }
}
