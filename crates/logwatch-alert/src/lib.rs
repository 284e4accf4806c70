//! Alert delivery for logwatch
//!
//! This crate provides the alert sink abstraction, the console and Slack
//! webhook sinks, retry handling, and the channel that decouples alert
//! delivery from log ingestion.

mod config;
mod dispatch;
mod error;
mod retry;
mod sink;
mod slack;

pub use config::AlertConfig;
pub use dispatch::{
    AlertDispatcher, AlertSender, DEFAULT_QUEUE_CAPACITY, DispatchStats, alert_channel,
    alert_channel_with_capacity,
};
pub use error::NotificationError;
pub use retry::{RetryStrategy, deliver_with_retry};
pub use sink::{AlertSink, ConsoleSink, RecordingSink};
pub use slack::SlackWebhookSink;

// Re-export types used in our public API
pub use logwatch_types::AlertEvent;
