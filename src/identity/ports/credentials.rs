//! Credential resolution port.

use crate::identity::domain::Principal;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for credential resolution.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Resolves a presented credential into a [`Principal`].
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verifies `credential` and returns the requester it identifies.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Expired`] for expired credentials,
    /// [`IdentityError::Invalid`] for malformed or forged ones, and
    /// [`IdentityError::Provider`] when the provider itself fails.
    async fn resolve(&self, credential: &str) -> IdentityResult<Principal>;
}

/// Errors returned by identity providers.
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    /// The credential has expired.
    #[error("credential has expired")]
    Expired,

    /// The credential could not be verified.
    #[error("invalid credential: {0}")]
    Invalid(String),

    /// The provider failed independently of the credential.
    #[error("identity provider error: {0}")]
    Provider(Arc<dyn std::error::Error + Send + Sync>),
}

impl IdentityError {
    /// Wraps a provider failure.
    pub fn provider(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Provider(Arc::new(err))
    }
}
