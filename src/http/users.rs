//! Current-user routes.

use super::auth::{CurrentUser, TOKEN_COOKIE};
use super::error::{ApiError, ApiResult};
use super::response::ApiResponse;
use super::state::AppState;
use crate::identity::domain::UserProfile;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, IntoResponse};

/// Returns the profile of the authenticated user.
pub async fn user_details(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> ApiResult<ApiResponse<UserProfile>> {
    let profile = state
        .directory
        .find_by_id(principal.id())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(ApiResponse::ok(profile))
}

/// Clears the session cookie.
pub async fn sign_out() -> impl IntoResponse {
    let expired = format!("{TOKEN_COOKIE}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax");
    (
        AppendHeaders([(SET_COOKIE, expired)]),
        ApiResponse::message("Signed out"),
    )
}
