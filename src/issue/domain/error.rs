//! Error types for issue domain validation and transitions.

use super::IssueStatus;
use thiserror::Error;

/// Errors returned while constructing or mutating issues.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IssueDomainError {
    /// The title is empty after trimming.
    #[error("issue title must not be empty")]
    EmptyTitle,

    /// The description is empty after trimming.
    #[error("issue description must not be empty")]
    EmptyDescription,

    /// The message body is empty after trimming.
    #[error("message body must not be empty")]
    EmptyMessageBody,

    /// No images were supplied where at least one is required.
    #[error("at least one image is required")]
    NoImages,

    /// The reporter contact is incomplete.
    #[error("invalid reporter contact: {0}")]
    InvalidContact(String),

    /// The issue identifier is not a UUID.
    #[error("invalid issue identifier: {0}")]
    InvalidIssueId(String),

    /// The status pair is not an allowed edge of the state machine.
    #[error("cannot move issue from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: IssueStatus,
        /// Requested status.
        to: IssueStatus,
    },

    /// Work cannot start before a technician is assigned.
    #[error("a technician must be assigned before work can start")]
    TechnicianRequired,
}

impl IssueDomainError {
    /// Returns whether the error is a state machine violation rather than
    /// bad input.
    #[must_use]
    pub const fn is_transition_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidStatusTransition { .. } | Self::TechnicianRequired
        )
    }
}

/// Error returned while parsing an issue status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown issue status: {0}")]
pub struct ParseIssueStatusError(pub String);
