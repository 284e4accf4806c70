use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::dispatch::DEFAULT_QUEUE_CAPACITY;
use crate::error::NotificationError;
use crate::retry::RetryStrategy;
use crate::sink::{AlertSink, ConsoleSink};
use crate::slack::SlackWebhookSink;

const DEFAULT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// `[alert]` section of the config file
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct AlertConfig {
    /// Incoming webhook; alerts go to the console when unset
    pub webhook_url: Option<String>,

    /// Per-request timeout for webhook delivery
    pub timeout_secs: u64,

    pub retry_attempts: u32,

    /// Base pause between attempts; zero retries immediately
    pub retry_delay_ms: u64,

    /// Undelivered alerts held before new ones are dropped
    pub queue_capacity: usize,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl AlertConfig {
    pub fn retry_strategy(&self) -> RetryStrategy {
        if self.retry_delay_ms == 0 {
            RetryStrategy::Immediate(self.retry_attempts)
        } else {
            RetryStrategy::LinearBackoff(self.retry_attempts, self.retry_delay_ms)
        }
    }

    /// Build the sink this configuration describes
    pub fn build_sink(&self) -> Result<Arc<dyn AlertSink>, NotificationError> {
        let sink: Arc<dyn AlertSink> =
            match self.webhook_url.as_deref().filter(|url| !url.is_empty()) {
                Some(url) => Arc::new(SlackWebhookSink::new(
                    url,
                    Duration::from_secs(self.timeout_secs),
                )?),
                None => Arc::new(ConsoleSink),
            };
        Ok(sink)
    }
}
