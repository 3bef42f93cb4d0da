//! Credential extraction for handlers.
//!
//! Credentials are read from an `Authorization: Bearer` header or, failing
//! that, from the `token` cookie set by the sign-in flow.

use super::error::ApiError;
use super::state::AppState;
use crate::identity::domain::Principal;
use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use tracing::{debug, warn};

/// Name of the session cookie carrying the credential.
pub const TOKEN_COOKIE: &str = "token";

/// Authenticated requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub Principal);

impl CurrentUser {
    /// Returns the resolved principal.
    #[must_use]
    pub const fn principal(&self) -> &Principal {
        &self.0
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.trim().split_once(' ')?;
    let trimmed = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn cookie_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == TOKEN_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_owned())
}

/// Returns the credential presented with the request, if any.
#[must_use]
pub fn presented_credential(parts: &Parts) -> Option<String> {
    bearer_token(parts).or_else(|| cookie_token(parts))
}

async fn resolve(parts: &Parts, state: &AppState, credential: &str) -> Result<CurrentUser, ApiError> {
    match state.identity.resolve(credential).await {
        Ok(principal) => {
            debug!(user_id = %principal.id(), role = %principal.role(), "request authenticated");
            Ok(CurrentUser(principal))
        }
        Err(err) => {
            warn!(error = %err, uri = %parts.uri, "credential rejected");
            Err(err.into())
        }
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<Self>() {
            return Ok(user.clone());
        }
        let Some(credential) = presented_credential(parts) else {
            debug!(uri = %parts.uri, "no credential presented");
            return Err(ApiError::unauthorized("Please sign in to continue"));
        };
        let user = resolve(parts, state, &credential).await?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// Anonymous requests yield `None`; a presented but invalid credential is
/// still rejected.
impl OptionalFromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        if presented_credential(parts).is_none() {
            return Ok(None);
        }
        <Self as FromRequestParts<AppState>>::from_request_parts(parts, state)
            .await
            .map(Some)
    }
}
