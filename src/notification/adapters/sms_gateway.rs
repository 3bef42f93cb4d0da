//! HTTP SMS gateway notifier.

use crate::notification::domain::{DeliveryReport, SmsMessage};
use crate::notification::ports::Notifier;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Sender identifier used when none is configured.
pub const DEFAULT_SENDER_ID: &str = "TextLKDemo";

/// Upper bound on one gateway call, connect through response body.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Gateway endpoint and credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct SmsGatewayConfig {
    /// Send endpoint URL.
    pub api_url: String,
    /// Bearer token.
    pub api_token: String,
    /// Sender identifier shown to recipients.
    pub sender_id: String,
}

impl std::fmt::Debug for SmsGatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsGatewayConfig")
            .field("api_url", &self.api_url)
            .field("api_token", &"***")
            .field("sender_id", &self.sender_id)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    recipient: &'a str,
    sender_id: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct GatewayError {
    message: Option<String>,
}

/// Notifier posting to a bearer-authenticated JSON SMS gateway.
#[derive(Debug, Clone)]
pub struct SmsGatewayNotifier {
    config: SmsGatewayConfig,
    client: reqwest::Client,
}

impl SmsGatewayNotifier {
    /// Creates a notifier for the configured gateway using
    /// [`DEFAULT_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns the client builder error when TLS initialisation fails.
    pub fn new(config: SmsGatewayConfig) -> Result<Self, reqwest::Error> {
        Self::with_timeout(config, DEFAULT_TIMEOUT)
    }

    /// Creates a notifier whose gateway calls give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns the client builder error when TLS initialisation fails.
    pub fn with_timeout(config: SmsGatewayConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl Notifier for SmsGatewayNotifier {
    async fn send(&self, message: &SmsMessage) -> DeliveryReport {
        let request = SendRequest {
            recipient: message.recipient.as_str(),
            sender_id: &self.config.sender_id,
            kind: "plain",
            message: &message.body,
        };
        let response = match self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(recipient = %message.recipient, error = %err, "sms gateway unreachable");
                return DeliveryReport::failed(err.to_string());
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status.is_success() {
            debug!(recipient = %message.recipient, "sms accepted by gateway");
            return DeliveryReport::delivered(body);
        }
        let detail = serde_json::from_str::<GatewayError>(&body)
            .ok()
            .and_then(|error| error.message)
            .unwrap_or_else(|| status.to_string());
        warn!(recipient = %message.recipient, %status, detail = %detail, "sms gateway rejected message");
        DeliveryReport::failed(detail)
    }
}
