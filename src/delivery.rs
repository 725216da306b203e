//! Webhook delivery: one POST per invocation, no retries.

use serde_json::Value;
use std::future::Future;
use tracing::{debug, info};

use crate::card::MessageCard;
use crate::error::{NotifyError, Result};

/// Status and body of a webhook response.
#[derive(Debug, Clone)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: String,
}

/// A thing that can POST a JSON document and report status plus body.
pub trait WebhookTransport {
    fn post_json(
        &self,
        url: &str,
        payload: &Value,
    ) -> impl Future<Output = Result<WebhookResponse>> + Send;
}

/// Transport backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("deploy_notify/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl WebhookTransport for HttpTransport {
    async fn post_json(&self, url: &str, payload: &Value) -> Result<WebhookResponse> {
        let response = self.client.post(url).json(payload).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(WebhookResponse { status, body })
    }
}

/// Serialize the card and deliver it to the webhook. Exactly one attempt:
/// a non-2xx response fails the pipeline with the status code and body.
pub async fn deliver_card<T: WebhookTransport>(
    transport: &T,
    webhook_url: &str,
    card: &MessageCard,
) -> Result<()> {
    let payload = serde_json::to_value(card)?;
    debug!("Notification payload: {}", payload);

    let response = transport.post_json(webhook_url, &payload).await?;
    if (200..300).contains(&response.status) {
        info!("Notification sent. HTTP {}", response.status);
        Ok(())
    } else {
        Err(NotifyError::DeliveryFailed {
            status: response.status,
            body: response.body,
        })
    }
}
