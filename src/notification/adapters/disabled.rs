//! Notifier used when no SMS gateway is configured.

use crate::notification::domain::{DeliveryReport, SmsMessage};
use crate::notification::ports::Notifier;
use async_trait::async_trait;
use tracing::debug;

/// Notifier that drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn send(&self, message: &SmsMessage) -> DeliveryReport {
        debug!(recipient = %message.recipient, "sms skipped, gateway not configured");
        DeliveryReport::failed("SMS service is not configured")
    }
}
