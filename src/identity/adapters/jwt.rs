//! HS256 bearer-token verification.

use crate::identity::domain::{Principal, Role, UserId};
use crate::identity::ports::{IdentityError, IdentityProvider, IdentityResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Minimum accepted secret length in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

/// Claims carried by access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User identifier.
    pub sub: String,
    /// Role name.
    pub role: String,
    /// Expiry as a Unix timestamp.
    pub exp: i64,
    /// Optional issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Settings for [`JwtIdentityProvider`].
#[derive(Clone, PartialEq, Eq)]
pub struct JwtSettings {
    secret: String,
    issuer: Option<String>,
}

impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"***")
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl JwtSettings {
    /// Creates settings from a shared secret.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Invalid`] when the secret is shorter than
    /// [`MIN_SECRET_BYTES`].
    pub fn new(secret: impl Into<String>) -> IdentityResult<Self> {
        let shared_secret = secret.into();
        if shared_secret.len() < MIN_SECRET_BYTES {
            return Err(IdentityError::Invalid(format!(
                "signing secret must be at least {MIN_SECRET_BYTES} bytes"
            )));
        }
        Ok(Self {
            secret: shared_secret,
            issuer: None,
        })
    }

    /// Requires tokens to carry the given issuer.
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }
}

/// Identity provider that verifies HS256 tokens signed with a shared secret.
#[derive(Clone)]
pub struct JwtIdentityProvider {
    settings: JwtSettings,
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for JwtIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtIdentityProvider")
            .field("issuer", &self.settings.issuer)
            .finish_non_exhaustive()
    }
}

impl JwtIdentityProvider {
    /// Creates a provider from validated settings.
    #[must_use]
    pub fn new(settings: JwtSettings) -> Self {
        let decoding_key = DecodingKey::from_secret(settings.secret.as_bytes());
        let encoding_key = EncodingKey::from_secret(settings.secret.as_bytes());
        Self {
            settings,
            decoding_key,
            encoding_key,
        }
    }

    /// Signs a token for `principal` that expires at `expires_at`.
    ///
    /// Tokens are normally issued by the identity collaborator; this is used
    /// by local tooling and tests that share the secret.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Provider`] when encoding fails.
    pub fn issue(&self, principal: &Principal, expires_at: DateTime<Utc>) -> IdentityResult<String> {
        let claims = Claims {
            sub: principal.id().to_string(),
            role: principal.role().as_str().to_owned(),
            exp: expires_at.timestamp(),
            iss: self.settings.issuer.clone(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(IdentityError::provider)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["sub", "exp"]);
        if let Some(issuer) = &self.settings.issuer {
            validation.set_issuer(&[issuer]);
        }
        validation
    }

    fn verify(&self, token: &str) -> IdentityResult<Principal> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation()).map_err(
            |err| match err.kind() {
                ErrorKind::ExpiredSignature => IdentityError::Expired,
                _ => IdentityError::Invalid(err.to_string()),
            },
        )?;
        let Claims {
            sub,
            role: role_name,
            ..
        } = data.claims;
        let id = UserId::new(sub).map_err(|err| IdentityError::Invalid(err.to_string()))?;
        let role = Role::try_from(role_name.as_str())
            .map_err(|err| IdentityError::Invalid(err.to_string()))?;
        Ok(Principal::new(id, role))
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn resolve(&self, credential: &str) -> IdentityResult<Principal> {
        self.verify(credential.trim())
    }
}
