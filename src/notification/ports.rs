//! Notifier port.

use super::domain::{DeliveryReport, SmsMessage};
use async_trait::async_trait;

/// Sends text messages.
///
/// Implementations report failures through [`DeliveryReport`] instead of
/// returning errors.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Attempts to send `message`.
    async fn send(&self, message: &SmsMessage) -> DeliveryReport;
}
