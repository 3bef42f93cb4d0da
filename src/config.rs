//! Process configuration read once at startup.
//!
//! Values come from environment variables (optionally seeded from a `.env`
//! file by the binary). [`AppConfig::from_lookup`] takes any key lookup so
//! tests do not have to touch the process environment.

use crate::http::state::DEFAULT_MAX_UPLOAD_BYTES;
use crate::identity::adapters::jwt::JwtSettings;
use crate::media::adapters::cloudinary::CloudinaryCredentials;
use crate::notification::adapters::sms_gateway::{DEFAULT_SENDER_ID, SmsGatewayConfig};
use camino::Utf8PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 4000;

/// Default database connection pool size.
pub const DEFAULT_POOL_SIZE: u32 = 8;

/// Default directory for local uploads.
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable has a value that cannot be used.
    #[error("{key} is invalid: {reason}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// What is wrong with the value.
        reason: String,
    },

    /// Only some variables of a group are set.
    #[error("{0} must be set together")]
    Incomplete(&'static str),
}

/// Where images are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaBackend {
    /// Cloudinary image host.
    Cloudinary(CloudinaryCredentials),
    /// Local filesystem directory served under `/uploads`.
    Local(Utf8PathBuf),
}

/// Startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Listening port.
    pub port: u16,
    /// `PostgreSQL` URL; in-memory adapters are used when absent.
    pub database_url: Option<String>,
    /// Database connection pool size.
    pub pool_size: u32,
    /// Allowed browser origin; CORS is permissive when absent.
    pub cors_origin: Option<String>,
    /// Credential verification settings.
    pub jwt: JwtSettings,
    /// Image storage.
    pub media: MediaBackend,
    /// SMS gateway; notifications are disabled when absent.
    pub sms: Option<SmsGatewayConfig>,
    /// Per-file upload limit in bytes.
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for missing or invalid values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for missing or invalid values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let mut jwt = JwtSettings::new(secret).map_err(|err| ConfigError::Invalid {
            key: "JWT_SECRET",
            reason: err.to_string(),
        })?;
        if let Some(issuer) = get("JWT_ISSUER") {
            jwt = jwt.with_issuer(issuer);
        }

        Ok(Self {
            port: parse_or("PORT", get("PORT"), DEFAULT_PORT)?,
            database_url: get("DATABASE_URL"),
            pool_size: parse_or("DATABASE_POOL_SIZE", get("DATABASE_POOL_SIZE"), DEFAULT_POOL_SIZE)?,
            cors_origin: get("CORS_ORIGIN"),
            jwt,
            media: media_backend(&get)?,
            sms: sms_gateway(&get)?,
            max_upload_bytes: parse_or(
                "MAX_UPLOAD_BYTES",
                get("MAX_UPLOAD_BYTES"),
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
        })
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.map_or(Ok(default), |value| {
        value.parse().map_err(|err: T::Err| ConfigError::Invalid {
            key,
            reason: err.to_string(),
        })
    })
}

fn media_backend(get: &impl Fn(&str) -> Option<String>) -> Result<MediaBackend, ConfigError> {
    let parts = (
        get("CLOUDINARY_CLOUD_NAME"),
        get("CLOUDINARY_API_KEY"),
        get("CLOUDINARY_API_SECRET"),
    );
    match parts {
        (Some(cloud_name), Some(api_key), Some(api_secret)) => {
            Ok(MediaBackend::Cloudinary(CloudinaryCredentials {
                cloud_name,
                api_key,
                api_secret,
            }))
        }
        (None, None, None) => Ok(MediaBackend::Local(Utf8PathBuf::from(
            get("UPLOAD_DIR").unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_owned()),
        ))),
        _ => Err(ConfigError::Incomplete(
            "CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET",
        )),
    }
}

fn sms_gateway(
    get: &impl Fn(&str) -> Option<String>,
) -> Result<Option<SmsGatewayConfig>, ConfigError> {
    match (get("SMS_API_URL"), get("SMS_API_TOKEN")) {
        (Some(api_url), Some(api_token)) => Ok(Some(SmsGatewayConfig {
            api_url,
            api_token,
            sender_id: get("SMS_SENDER_ID").unwrap_or_else(|| DEFAULT_SENDER_ID.to_owned()),
        })),
        (None, None) => Ok(None),
        _ => Err(ConfigError::Incomplete("SMS_API_URL and SMS_API_TOKEN")),
    }
}
