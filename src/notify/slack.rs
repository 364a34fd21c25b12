use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::{RcPublishError, Result};
use crate::notify::Notifier;

/// Slack incoming-webhook implementation of the chat sink
pub struct SlackWebhook {
    client: Client,
    webhook_url: String,
}

impl SlackWebhook {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        SlackWebhook {
            client: Client::new(),
            webhook_url: webhook_url.into(),
        }
    }
}

#[async_trait]
impl Notifier for SlackWebhook {
    async fn post(&self, message: &Value) -> Result<()> {
        tracing::debug!("posting chat notification");
        let response = self
            .client
            .post(&self.webhook_url)
            .json(message)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RcPublishError::notify(format!(
                "webhook returned {}: {}",
                status,
                body.trim()
            )));
        }

        Ok(())
    }
}
