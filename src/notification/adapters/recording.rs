//! Notifier that records messages in memory.

use crate::notification::domain::{DeliveryReport, SmsMessage};
use crate::notification::ports::Notifier;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Records every message it is asked to send.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<SmsMessage>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent sends report failure (messages are still recorded).
    pub fn fail_deliveries(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Returns a copy of the recorded messages.
    #[must_use]
    pub fn sent(&self) -> Vec<SmsMessage> {
        self.sent
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &SmsMessage) -> DeliveryReport {
        if let Ok(mut messages) = self.sent.lock() {
            messages.push(message.clone());
        }
        if self.failing.load(Ordering::SeqCst) {
            DeliveryReport::failed("delivery failure injected")
        } else {
            DeliveryReport::delivered("recorded")
        }
    }
}
