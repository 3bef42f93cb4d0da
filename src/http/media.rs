//! Serves images held by the local media store.

use super::error::{ApiError, ApiResult};
use super::state::AppState;
use axum::extract::{Path, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::IntoResponse;

fn content_type_for(file: &str) -> &'static str {
    let extension = file
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// `GET /uploads/{folder}/{file}`.
pub async fn serve_upload(
    State(state): State<AppState>,
    Path((folder, file)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let not_found = || ApiError::not_found("File not found");
    let store = state.local_media.as_ref().ok_or_else(not_found)?;
    let media_id = format!("{folder}/{file}");
    let bytes = store.read(&media_id).await?.ok_or_else(not_found)?;
    Ok((
        [
            (CONTENT_TYPE, content_type_for(&file)),
            (CACHE_CONTROL, "public, max-age=86400"),
        ],
        bytes,
    ))
}
