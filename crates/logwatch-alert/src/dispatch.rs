use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, info, warn};

use logwatch_types::AlertEvent;

use crate::error::NotificationError;
use crate::retry::{RetryStrategy, deliver_with_retry};
use crate::sink::AlertSink;

/// Alerts waiting for delivery before new ones are dropped
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Create a connected sender/dispatcher pair for the given sink
pub fn alert_channel(
    sink: Arc<dyn AlertSink>,
    retry: RetryStrategy,
) -> (AlertSender, AlertDispatcher) {
    alert_channel_with_capacity(sink, retry, DEFAULT_QUEUE_CAPACITY)
}

/// Like [`alert_channel`], holding at most `capacity` undelivered alerts
pub fn alert_channel_with_capacity(
    sink: Arc<dyn AlertSink>,
    retry: RetryStrategy,
    capacity: usize,
) -> (AlertSender, AlertDispatcher) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        AlertSender { tx },
        AlertDispatcher { rx, sink, retry },
    )
}

/// Hands alerts to the dispatcher without waiting for delivery
#[derive(Clone, Debug)]
pub struct AlertSender {
    tx: mpsc::Sender<AlertEvent>,
}

impl AlertSender {
    /// Queue an alert for delivery
    ///
    /// Never waits: when the queue is full the alert is dropped and
    /// `QueueFull` is returned.
    pub fn send(&self, event: AlertEvent) -> Result<(), NotificationError> {
        match self.tx.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(event)) => {
                warn!(
                    line = event.line_number,
                    capacity = self.tx.max_capacity(),
                    "Alert queue full, dropping alert"
                );
                Err(NotificationError::QueueFull)
            }
            Err(TrySendError::Closed(_)) => Err(NotificationError::Closed),
        }
    }
}

/// Delivery counters reported when the dispatcher stops
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub delivered: u64,
    pub failed: u64,
}

/// Delivers queued alerts one at a time, in order
pub struct AlertDispatcher {
    rx: mpsc::Receiver<AlertEvent>,
    sink: Arc<dyn AlertSink>,
    retry: RetryStrategy,
}

impl AlertDispatcher {
    /// Run until every sender is dropped and the queue is drained
    pub async fn run(mut self) -> DispatchStats {
        let mut stats = DispatchStats::default();
        info!(sink = self.sink.name(), "Alert dispatcher started");

        while let Some(event) = self.rx.recv().await {
            match deliver_with_retry(self.sink.as_ref(), event.message(), &self.retry).await {
                Ok(()) => {
                    stats.delivered += 1;
                    debug!(line = event.line_number, "Alert delivered");
                }
                Err(e) => {
                    // Dropped after the retry budget; ingestion carries on
                    stats.failed += 1;
                    error!(
                        line = event.line_number,
                        status = %event.status_code,
                        "Failed to deliver alert: {}", e
                    );
                }
            }
        }

        info!(
            delivered = stats.delivered,
            failed = stats.failed,
            "Alert dispatcher stopped"
        );
        stats
    }
}
