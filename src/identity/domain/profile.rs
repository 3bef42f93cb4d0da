//! User profile read model.

use super::{Role, UserId};
use serde::{Deserialize, Serialize};

/// Profile data held by the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User identifier.
    pub id: UserId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone used for SMS notifications.
    pub phone: Option<String>,
    /// Granted role.
    pub role: Role,
}

impl UserProfile {
    /// Creates a profile without a phone number.
    #[must_use]
    pub fn new(
        id: UserId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: None,
            role,
        }
    }

    /// Sets the contact phone; blank values clear it.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        let value = phone.into();
        let normalized = value.trim();
        self.phone = (!normalized.is_empty()).then(|| normalized.to_owned());
        self
    }

    /// Returns "first last" with surrounding whitespace removed.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}
