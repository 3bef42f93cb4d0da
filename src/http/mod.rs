//! HTTP transport: routing, extractors and the response envelope.
//!
//! Handlers translate requests into service calls and never hold business
//! rules themselves.

pub mod auth;
pub mod error;
mod health;
mod issues;
mod media;
mod products;
pub mod response;
pub mod state;
pub mod upload;
mod users;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use response::ApiResponse;
use state::AppState;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

/// Upper bound on distinct image files accepted in one request. The
/// request body limit is this many times the per-file limit.
pub const MAX_FILES_PER_REQUEST: usize = 10;

/// Builds the CORS policy: permissive without an origin, otherwise limited
/// to `origin` with credentials allowed.
///
/// # Errors
///
/// Returns an error when `origin` is not a valid header value.
pub fn cors_layer(origin: Option<&str>) -> Result<CorsLayer, axum::http::header::InvalidHeaderValue> {
    let Some(allowed) = origin else {
        return Ok(CorsLayer::new()
            .allow_origin(AnyOrigin)
            .allow_methods(AnyOrigin)
            .allow_headers(AnyOrigin));
    };
    Ok(CorsLayer::new()
        .allow_origin(HeaderValue::from_str(allowed)?)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]))
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_default();
    error!(%detail, "handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ApiResponse::<()>::failure("Internal server error"),
    )
        .into_response()
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        ApiResponse::<()>::failure("Route not found"),
    )
}

/// Builds the application router with every route and middleware layer.
pub fn router(state: AppState, cors: CorsLayer) -> Router {
    let body_limit = state
        .max_upload_bytes
        .saturating_mul(MAX_FILES_PER_REQUEST);
    let api = Router::new()
        .nest("/issues", issues::router())
        .nest("/products", products::router())
        .route("/user-details", get(users::user_details))
        .route("/signout", post(users::sign_out));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/uploads/{folder}/{file}", get(media::serve_upload))
        .nest("/api", api)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
