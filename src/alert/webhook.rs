//! Webhook delivery for surebet alerts

use super::{AlertSink, SurebetAlert};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// POSTs each alert as JSON to a webhook URL
pub struct WebhookAlerter {
    url: String,
    client: Client,
}

impl WebhookAlerter {
    /// Create an alerter with a per-request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AlertSink for WebhookAlerter {
    async fn notify(&self, alert: &SurebetAlert) -> anyhow::Result<()> {
        let response = self.client.post(&self.url).json(alert).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("Webhook returned {}", response.status());
        }

        tracing::info!(
            sport = %alert.sport,
            event = %alert.event.id,
            "Surebet alert delivered"
        );
        Ok(())
    }
}
