use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::NotificationError;
use crate::sink::AlertSink;

/// Incoming-webhook payload
#[derive(Serialize)]
struct SlackMessage<'a> {
    text: &'a str,
}

/// Posts alerts to a Slack-style incoming webhook
#[derive(Clone, Debug)]
pub struct SlackWebhookSink {
    client: reqwest::Client,
    url: String,
}

impl SlackWebhookSink {
    /// Create a sink for the given webhook URL with a per-request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NotificationError::Client)?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl AlertSink for SlackWebhookSink {
    async fn notify(&self, message: &str) -> Result<(), NotificationError> {
        info!("Sending alert to Slack: {}", message);

        let resp = self
            .client
            .post(&self.url)
            .json(&SlackMessage { text: message })
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            debug!("Webhook accepted alert with {}", status);
            return Ok(());
        }

        Err(NotificationError::Status {
            status: status.as_u16(),
            body: resp.text().await.unwrap_or_default(),
        })
    }

    fn name(&self) -> &'static str {
        "slack"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_posts_raw_line_as_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .match_header("content-type", "application/json")
            .match_body(Matcher::JsonString(
                r#"{"text":"a b c d e f g h 503 x\n"}"#.to_string(),
            ))
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let sink = SlackWebhookSink::new(format!("{}/hook", server.url()), Duration::from_secs(5))
            .expect("failed to build sink");
        sink.notify("a b c d e f g h 503 x\n")
            .await
            .expect("delivery should succeed");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/hook")
            .with_status(404)
            .with_body("no_service")
            .create_async()
            .await;

        let sink = SlackWebhookSink::new(format!("{}/hook", server.url()), Duration::from_secs(5))
            .expect("failed to build sink");
        let err = sink.notify("boom").await.unwrap_err();

        match err {
            NotificationError::Status { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "no_service");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
