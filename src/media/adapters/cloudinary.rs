//! Cloudinary media store over the signed upload API.

use crate::media::domain::{StoredImage, UploadedFile};
use crate::media::ports::{MediaStore, MediaStoreError, MediaStoreResult};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Default API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

/// Upper bound on one API call, uploads included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Account credentials for the Cloudinary API.
#[derive(Clone, PartialEq, Eq)]
pub struct CloudinaryCredentials {
    /// Cloud (account) name.
    pub cloud_name: String,
    /// API key.
    pub api_key: String,
    /// API secret used for request signing.
    pub api_secret: String,
}

impl std::fmt::Debug for CloudinaryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Media store backed by Cloudinary.
#[derive(Debug, Clone)]
pub struct CloudinaryMediaStore {
    credentials: CloudinaryCredentials,
    api_base: String,
    client: reqwest::Client,
}

impl CloudinaryMediaStore {
    /// Creates a store against the public API.
    ///
    /// # Errors
    ///
    /// Returns [`MediaStoreError::Backend`] when the HTTP client cannot be
    /// built.
    pub fn new(credentials: CloudinaryCredentials) -> MediaStoreResult<Self> {
        Self::with_api_base(credentials, DEFAULT_API_BASE)
    }

    /// Creates a store against a custom API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`MediaStoreError::Backend`] when the HTTP client cannot be
    /// built.
    pub fn with_api_base(credentials: CloudinaryCredentials, api_base: &str) -> MediaStoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(MediaStoreError::backend)?;
        Ok(Self {
            credentials,
            api_base: api_base.trim_end_matches('/').to_owned(),
            client,
        })
    }

    fn endpoint(&self, resource: &str, action: &str) -> String {
        format!(
            "{}/v1_1/{}/{resource}/{action}",
            self.api_base, self.credentials.cloud_name
        )
    }

    fn sign(&self, params: &BTreeMap<&str, String>) -> String {
        sign_params(params, &self.credentials.api_secret)
    }
}

/// Computes the SHA-256 request signature for `params`.
///
/// Parameters are joined as `key=value` pairs in key order with `&`, then the
/// secret is appended before hashing.
#[must_use]
pub fn sign_params(params: &BTreeMap<&str, String>, secret: &str) -> String {
    let joined = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

async fn rejection(response: reqwest::Response) -> MediaStoreError {
    let status = response.status();
    let detail = match response.json::<ErrorBody>().await {
        Ok(body) => body.error.message,
        Err(_) => status.to_string(),
    };
    MediaStoreError::Rejected(format!("{status}: {detail}"))
}

#[async_trait]
impl MediaStore for CloudinaryMediaStore {
    async fn upload(&self, file: &UploadedFile, folder: &str) -> MediaStoreResult<StoredImage> {
        let timestamp = Utc::now().timestamp().to_string();
        let signed = BTreeMap::from([("folder", folder.to_owned()), ("timestamp", timestamp)]);
        let signature = self.sign(&signed);

        let mut part = Part::bytes(file.bytes().to_vec()).file_name(file.file_name().to_owned());
        if let Some(content_type) = file.content_type() {
            part = part.mime_str(content_type).map_err(MediaStoreError::backend)?;
        }
        let mut form = Form::new()
            .part("file", part)
            .text("api_key", self.credentials.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in signed {
            form = form.text(key, value);
        }

        let response = self
            .client
            .post(self.endpoint("auto", "upload"))
            .multipart(form)
            .send()
            .await
            .map_err(MediaStoreError::backend)?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        let body: UploadResponse = response.json().await.map_err(MediaStoreError::backend)?;
        debug!(public_id = %body.public_id, "cloudinary upload complete");
        Ok(StoredImage::new(body.secure_url, body.public_id))
    }

    async fn delete(&self, media_id: &str) -> MediaStoreResult<()> {
        let timestamp = Utc::now().timestamp().to_string();
        let signed = BTreeMap::from([("public_id", media_id.to_owned()), ("timestamp", timestamp)]);
        let signature = self.sign(&signed);

        let mut params: Vec<(&str, String)> = signed.into_iter().collect();
        params.push(("api_key", self.credentials.api_key.clone()));
        params.push(("signature", signature));
        params.push(("signature_algorithm", "sha256".to_owned()));

        let response = self
            .client
            .post(self.endpoint("image", "destroy"))
            .form(&params)
            .send()
            .await
            .map_err(MediaStoreError::backend)?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        let body: DestroyResponse = response.json().await.map_err(MediaStoreError::backend)?;
        match body.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(MediaStoreError::Rejected(format!(
                "destroy of {media_id} returned {other}"
            ))),
        }
    }
}
