// In crates/notifier/src/slack.rs

use std::time::Duration;

use app_config::SlackSettings;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;

use crate::Notifier;
use crate::error::{Error, Result};

/// Posts alerts to a Slack incoming webhook.
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    http_client: Client,
    webhook_url: String,
}

impl SlackNotifier {
    pub fn new(settings: &SlackSettings) -> Result<Self> {
        if settings.webhook_url.trim().is_empty() {
            return Err(Error::MissingWebhook);
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;

        Ok(Self {
            http_client,
            webhook_url: settings.webhook_url.clone(),
        })
    }

    /// Sends `{"text": message}`; only HTTP 200 counts as accepted.
    pub async fn post(&self, message: &str) -> Result<()> {
        let response = self
            .http_client
            .post(&self.webhook_url)
            .json(&json!({ "text": message }))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(Error::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    fn name(&self) -> &'static str {
        "Slack"
    }

    async fn deliver(&self, message: &str) -> core_types::Result<()> {
        self.post(message).await.map_err(Into::into)
    }
}
