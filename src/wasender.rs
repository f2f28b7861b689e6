use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::config::WasenderConfig;

/// Outbound reply delivery. An implementation either confirms the send or
/// reports the failure; the engine records the outcome and never retries.
#[async_trait]
pub trait Delivery: Send + Sync {
    async fn send(&self, to: &str, text: &str) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    to: &'a str,
    text: &'a str,
}

/// WhatsApp delivery through the Wasender HTTP API.
pub struct WasenderClient {
    client: reqwest::Client,
    config: WasenderConfig,
}

impl WasenderClient {
    pub fn new(config: WasenderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Delivery for WasenderClient {
    async fn send(&self, to: &str, text: &str) -> Result<()> {
        let url = format!("{}/send-message", self.config.api_endpoint);

        debug!("Sending message via Wasender: {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&SendMessageRequest { to, text })
            .send()
            .await
            .context("Failed to send request to Wasender API")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Wasender API error ({}): {}", status, error_body);
        }

        Ok(())
    }
}
