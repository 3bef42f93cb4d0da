//! Notification value types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Country prefix that replaces a leading trunk `0`.
pub const DEFAULT_COUNTRY_CODE: &str = "94";

/// Error returned for unusable phone numbers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PhoneNumberError {
    /// No digits were supplied.
    #[error("phone number is required")]
    Empty,

    /// The value contains characters other than digits and separators.
    #[error("invalid phone number: {0}")]
    Invalid(String),
}

/// Phone number in international digits-only form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalizes a phone number.
    ///
    /// Spaces, dashes and a leading `+` are dropped, and a leading trunk
    /// `0` is replaced with [`DEFAULT_COUNTRY_CODE`], so `077 123 4567`
    /// becomes `94771234567`.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneNumberError`] when no digits remain or the value holds
    /// other characters.
    pub fn parse(raw: &str) -> Result<Self, PhoneNumberError> {
        let trimmed = raw.trim();
        let without_plus = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let digits: String = without_plus
            .chars()
            .filter(|ch| !matches!(ch, ' ' | '-' | '(' | ')'))
            .collect();
        if digits.is_empty() {
            return Err(PhoneNumberError::Empty);
        }
        if !digits.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(PhoneNumberError::Invalid(raw.to_owned()));
        }
        Ok(match digits.strip_prefix('0') {
            Some(rest) => Self(format!("{DEFAULT_COUNTRY_CODE}{rest}")),
            None => Self(digits),
        })
    }

    /// Returns the normalized digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Text message to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsMessage {
    /// Recipient number.
    pub recipient: PhoneNumber,
    /// Message text.
    pub body: String,
}

impl SmsMessage {
    /// Creates a message.
    #[must_use]
    pub fn new(recipient: PhoneNumber, body: impl Into<String>) -> Self {
        Self {
            recipient,
            body: body.into(),
        }
    }
}

/// Outcome of a send attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    /// Whether the provider accepted the message.
    pub delivered: bool,
    /// Provider response or failure reason.
    pub detail: String,
}

impl DeliveryReport {
    /// Report for an accepted message.
    #[must_use]
    pub fn delivered(detail: impl Into<String>) -> Self {
        Self {
            delivered: true,
            detail: detail.into(),
        }
    }

    /// Report for a message that was not sent.
    #[must_use]
    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            delivered: false,
            detail: detail.into(),
        }
    }
}
