use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::NotificationError;

/// A channel that delivers alert messages to humans
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Deliver one alert message
    async fn notify(&self, message: &str) -> Result<(), NotificationError>;

    /// Short name used in log output
    fn name(&self) -> &'static str;
}

/// Prints alerts to stdout instead of delivering them
///
/// Used when no webhook endpoint is configured.
#[derive(Clone, Debug, Default)]
pub struct ConsoleSink;

#[async_trait]
impl AlertSink for ConsoleSink {
    async fn notify(&self, message: &str) -> Result<(), NotificationError> {
        print!("{}", console_alert(message));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "console"
    }
}

/// Console rendering of an alert; the message is kept verbatim
fn console_alert(message: &str) -> String {
    let mut out = format!("Sending alert to Slack: {}", message);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Keeps every alert in memory
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far, in delivery order
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

#[async_trait]
impl AlertSink for RecordingSink {
    async fn notify(&self, message: &str) -> Result<(), NotificationError> {
        self.messages.lock().push(message.to_string());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
