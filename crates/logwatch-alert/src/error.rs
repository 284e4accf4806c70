use thiserror::Error;

/// Failure to deliver an alert
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to alert endpoint failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("alert endpoint responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("alert dispatcher is no longer running")]
    Closed,

    #[error("alert queue is full")]
    QueueFull,
}

impl NotificationError {
    /// Client errors (4xx) will not succeed on retry
    pub fn is_permanent(&self) -> bool {
        match self {
            Self::Status { status, .. } => (400..500).contains(status),
            Self::Client(_) | Self::Closed => true,
            Self::Request(_) | Self::QueueFull => false,
        }
    }
}
