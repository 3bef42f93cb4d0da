//! Mapping of service errors onto HTTP responses.

use super::response::ApiResponse;
use crate::catalog::domain::CatalogDomainError;
use crate::catalog::services::CatalogError;
use crate::error::ErrorKind;
use crate::identity::domain::IdentityDomainError;
use crate::identity::ports::{IdentityError, UserDirectoryError};
use crate::issue::domain::{IssueDomainError, ParseIssueStatusError};
use crate::issue::services::IssueLifecycleError;
use crate::media::ports::MediaStoreError;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, error};

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned by handlers, rendered as a `{success: false}` envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
}

impl ApiError {
    /// Creates an error of the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Returns the classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the client-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Builds an error from a classified failure, hiding server-side detail.
    fn classified(kind: ErrorKind, err: &dyn std::error::Error) -> Self {
        match kind {
            ErrorKind::Internal => {
                error!(error = %err, "internal error");
                Self::new(kind, "Internal server error")
            }
            ErrorKind::Upstream => {
                error!(error = %err, "upstream service failed");
                Self::new(kind, "Upstream service unavailable")
            }
            _ => Self::new(kind, err.to_string()),
        }
    }
}

/// Maps an error kind to its HTTP status code.
#[must_use]
pub const fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidTransition => StatusCode::CONFLICT,
        ErrorKind::Upstream => StatusCode::BAD_GATEWAY,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.kind);
        if self.kind.is_client_error() {
            debug!(kind = %self.kind, message = %self.message, "request rejected");
        }
        (status, ApiResponse::<()>::failure(self.message)).into_response()
    }
}

impl From<IssueLifecycleError> for ApiError {
    fn from(err: IssueLifecycleError) -> Self {
        Self::classified(err.kind(), &err)
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self::classified(err.kind(), &err)
    }
}

impl From<IssueDomainError> for ApiError {
    fn from(err: IssueDomainError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<ParseIssueStatusError> for ApiError {
    fn from(err: ParseIssueStatusError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<CatalogDomainError> for ApiError {
    fn from(err: CatalogDomainError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<IdentityDomainError> for ApiError {
    fn from(err: IdentityDomainError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<MediaStoreError> for ApiError {
    fn from(err: MediaStoreError) -> Self {
        let kind = match err {
            MediaStoreError::Rejected(_) | MediaStoreError::InvalidMediaId(_) => {
                ErrorKind::Validation
            }
            MediaStoreError::Backend(_) => ErrorKind::Upstream,
        };
        Self::classified(kind, &err)
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Expired => Self::unauthorized("Session expired, please sign in again"),
            IdentityError::Invalid(_) => Self::unauthorized("Invalid credentials"),
            IdentityError::Provider(_) => Self::classified(ErrorKind::Upstream, &err),
        }
    }
}

impl From<UserDirectoryError> for ApiError {
    fn from(err: UserDirectoryError) -> Self {
        Self::classified(ErrorKind::Internal, &err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::validation(format!("invalid multipart body: {}", err.body_text()))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        Self::validation(err.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(err: QueryRejection) -> Self {
        Self::validation(err.body_text())
    }
}
