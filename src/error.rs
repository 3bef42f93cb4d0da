//! Error classification shared by every bounded context.
//!
//! Service errors stay context-specific; this module only provides the
//! coarse [`ErrorKind`] the transport layer maps to a status code.

use std::fmt;

/// Coarse classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input failed shape or content validation.
    Validation,
    /// The requester is not authenticated or the credential is invalid.
    Unauthorized,
    /// The requester lacks the required role.
    Forbidden,
    /// The referenced entity does not exist.
    NotFound,
    /// A state machine rule rejected the requested change.
    InvalidTransition,
    /// An external collaborator (media host, gateway) failed.
    Upstream,
    /// Persistence or another internal component failed.
    Internal,
}

impl ErrorKind {
    /// Returns the canonical lowercase name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::InvalidTransition => "invalid_transition",
            Self::Upstream => "upstream",
            Self::Internal => "internal",
        }
    }

    /// Returns whether the failure was caused by the caller.
    #[must_use]
    pub const fn is_client_error(self) -> bool {
        !matches!(self, Self::Upstream | Self::Internal)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
