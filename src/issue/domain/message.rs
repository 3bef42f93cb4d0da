//! Messages exchanged on an issue thread.

use super::{IssueDomainError, MessageId};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A message in an issue thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    id: MessageId,
    author: UserId,
    body: String,
    created_at: DateTime<Utc>,
    read_by: BTreeSet<UserId>,
}

impl Message {
    /// Creates a message with a fresh identifier and timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::EmptyMessageBody`] when the body is blank.
    pub fn new(author: UserId, body: &str, clock: &impl Clock) -> Result<Self, IssueDomainError> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Err(IssueDomainError::EmptyMessageBody);
        }
        Ok(Self {
            id: MessageId::new(),
            author,
            body: trimmed.to_owned(),
            created_at: clock.utc(),
            read_by: BTreeSet::new(),
        })
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the author.
    #[must_use]
    pub const fn author(&self) -> &UserId {
        &self.author
    }

    /// Returns the trimmed body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the users who have read the message.
    #[must_use]
    pub const fn read_by(&self) -> &BTreeSet<UserId> {
        &self.read_by
    }

    /// Returns whether `reader` has read the message.
    #[must_use]
    pub fn is_read_by(&self, reader: &UserId) -> bool {
        self.read_by.contains(reader)
    }

    /// Records `reader`; returns `false` when already recorded.
    pub fn mark_read_by(&mut self, reader: &UserId) -> bool {
        self.read_by.insert(reader.clone())
    }
}
