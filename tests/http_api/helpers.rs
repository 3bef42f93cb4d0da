//! Shared fixtures for router tests.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use chrono::{Duration, Utc};
use rstest::fixture;
use serde_json::Value;
use servicedesk::catalog::adapters::memory::{InMemoryInventory, InMemoryProductRepository};
use servicedesk::http::state::{AppState, Collaborators};
use servicedesk::http::{cors_layer, router};
use servicedesk::identity::adapters::jwt::{JwtIdentityProvider, JwtSettings};
use servicedesk::identity::adapters::memory::InMemoryUserDirectory;
use servicedesk::identity::domain::{Principal, Role, UserId, UserProfile};
use servicedesk::issue::adapters::memory::InMemoryIssueRepository;
use servicedesk::media::adapters::memory::InMemoryMediaStore;
use servicedesk::notification::adapters::recording::RecordingNotifier;
use tower::ServiceExt;

const SECRET: &str = "router-tests-secret-0123456789abcdef";
const BOUNDARY: &str = "servicedesk-test-boundary";

/// Router plus handles on the adapters behind it.
pub struct TestApp {
    pub router: Router,
    pub media: Arc<InMemoryMediaStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub inventory: Arc<InMemoryInventory>,
    tokens: JwtIdentityProvider,
}

impl TestApp {
    /// Signs a bearer token for `id` with `role`.
    pub fn token(&self, id: &str, role: Role) -> String {
        let principal = Principal::new(UserId::new(id).expect("valid user id"), role);
        self.tokens
            .issue(&principal, Utc::now() + Duration::hours(1))
            .expect("token signs")
    }

    /// Sends `request` and returns the status with the decoded JSON body.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        (status, body)
    }
}

#[fixture]
pub fn app() -> TestApp {
    let media = Arc::new(InMemoryMediaStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let inventory = Arc::new(InMemoryInventory::new());
    let directory = Arc::new(InMemoryUserDirectory::new());
    directory
        .insert(
            UserProfile::new(
                UserId::new("reporter-1").expect("valid user id"),
                "Nimal",
                "Perera",
                "nimal@example.com",
                Role::User,
            )
            .with_phone("0771234567"),
        )
        .expect("profile insert");
    let settings = JwtSettings::new(SECRET).expect("secret long enough");
    let state = AppState::new(Collaborators {
        issues: Arc::new(InMemoryIssueRepository::new()),
        products: Arc::new(InMemoryProductRepository::new()),
        inventory: inventory.clone(),
        media: media.clone(),
        notifier: notifier.clone(),
        directory,
        identity: Arc::new(JwtIdentityProvider::new(settings.clone())),
    })
    .expect("templates load")
    .with_max_upload_bytes(1024);
    TestApp {
        router: router(state, cors_layer(None).expect("permissive cors")),
        media,
        notifier,
        inventory,
        tokens: JwtIdentityProvider::new(settings),
    }
}

/// Builds a request with an optional bearer token and JSON body.
pub fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {value}"));
    }
    let payload = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    builder.body(payload).expect("valid request")
}

/// One part of a multipart body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

/// Builds a `multipart/form-data` request.
pub fn multipart_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    parts: &[Part<'_>],
) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File(field, file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: image/jpeg\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder().method(method).uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(value) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {value}"));
    }
    builder.body(Body::from(body)).expect("valid request")
}

/// Reads a string member from a JSON pointer.
pub fn text_at<'a>(body: &'a Value, pointer: &str) -> &'a str {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("missing string at {pointer} in {body}"))
}
