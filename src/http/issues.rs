//! Issue routes under `/api/issues`.

use super::auth::CurrentUser;
use super::error::{ApiError, ApiResult};
use super::response::ApiResponse;
use super::state::AppState;
use super::upload::{UploadForm, discard_uploads, store_uploads};
use crate::identity::domain::UserId;
use crate::issue::domain::{Issue, IssueId, IssuePatch, IssueStatus, ReporterContact};
use crate::issue::ports::IssueFilter;
use crate::issue::services::{
    CreateIssueRequest, EditIssueRequest, IssueDeletion, ListIssuesRequest,
};
use crate::media::domain::ISSUE_IMAGE_FOLDER;
use crate::pagination::{Page, Pagination};
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::Router;
use serde::Deserialize;

/// Builds the issue router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_issue).get(list_issues))
        .route("/user", get(list_my_issues))
        .route(
            "/{id}",
            get(get_issue).put(edit_issue).delete(delete_issue),
        )
        .route("/{id}/images", post(add_images))
        .route("/{id}/status", put(update_status))
        .route("/{id}/messages", post(add_message))
        .route("/{id}/messages/read", put(mark_messages_read))
        .route(
            "/{id}/technician",
            post(assign_technician).delete(remove_technician),
        )
}

fn parse_issue_id(raw: &str) -> ApiResult<IssueId> {
    Ok(raw.parse::<IssueId>()?)
}

fn contact_from(form: &UploadForm) -> ApiResult<Option<ReporterContact>> {
    match (form.text("name"), form.text("phone")) {
        (None, None) => Ok(None),
        (name, phone) => Ok(Some(ReporterContact::new(
            name.unwrap_or_default(),
            phone.unwrap_or_default(),
        )?)),
    }
}

async fn create_issue(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, ApiResponse<Issue>)> {
    let form = UploadForm::read(multipart, state.max_upload_bytes).await?;
    let mut request = CreateIssueRequest::new(form.require("title")?, form.require("description")?);
    if let Some(contact) = contact_from(&form)? {
        request = request.with_contact(contact);
    }
    if let Some(CurrentUser(principal)) = user {
        request = request.with_reporter(principal.id().clone());
    }
    let images = store_uploads(&*state.media, &form, ISSUE_IMAGE_FOLDER).await?;
    match state.issues.create(request.with_images(images.clone())).await {
        Ok(issue) => Ok((
            StatusCode::CREATED,
            ApiResponse::ok(issue).with_message("Issue reported"),
        )),
        Err(err) => {
            discard_uploads(&*state.media, &images).await;
            Err(err.into())
        }
    }
}

async fn add_images(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<ApiResponse<Issue>> {
    let issue_id = parse_issue_id(&id)?;
    let form = UploadForm::read(multipart, state.max_upload_bytes).await?;
    if form.files().is_empty() {
        return Err(ApiError::validation("No images provided"));
    }
    let images = store_uploads(&*state.media, &form, ISSUE_IMAGE_FOLDER).await?;
    match state.issues.add_images(issue_id, images.clone()).await {
        Ok(issue) => Ok(ApiResponse::ok(issue).with_message("Images added")),
        Err(err) => {
            discard_uploads(&*state.media, &images).await;
            Err(err.into())
        }
    }
}

/// Query string accepted by the issue listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListIssuesQuery {
    page: Option<u32>,
    limit: Option<u32>,
    status: Option<String>,
    technician: Option<String>,
    reporter: Option<String>,
}

impl ListIssuesQuery {
    fn into_request(self) -> ApiResult<ListIssuesRequest> {
        let status = self
            .status
            .as_deref()
            .map(IssueStatus::try_from)
            .transpose()?;
        let technician = self.technician.map(UserId::new).transpose()?;
        let reporter = self.reporter.map(UserId::new).transpose()?;
        Ok(ListIssuesRequest {
            filter: IssueFilter {
                status,
                technician,
                reporter,
            },
            page: Pagination::new(self.page, self.limit),
        })
    }
}

async fn list_issues(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    query: Result<Query<ListIssuesQuery>, QueryRejection>,
) -> ApiResult<ApiResponse<Page<Issue>>> {
    let Query(params) = query?;
    let request = params.into_request()?;
    Ok(ApiResponse::ok(
        state.issues.list_all(&request, &principal).await?,
    ))
}

async fn list_my_issues(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> ApiResult<ApiResponse<Vec<Issue>>> {
    Ok(ApiResponse::ok(
        state.issues.list_mine(principal.id()).await?,
    ))
}

async fn get_issue(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<Issue>> {
    let issue_id = parse_issue_id(&id)?;
    Ok(ApiResponse::ok(
        state.issues.get_by_id(issue_id, &principal).await?,
    ))
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    status: String,
}

async fn update_status(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<StatusBody>, JsonRejection>,
) -> ApiResult<ApiResponse<Issue>> {
    let issue_id = parse_issue_id(&id)?;
    let Json(body) = payload?;
    let target = IssueStatus::try_from(body.status.as_str())?;
    let issue = state
        .issues
        .update_status(issue_id, target, &principal)
        .await?;
    Ok(ApiResponse::ok(issue).with_message("Status updated"))
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    #[serde(alias = "message")]
    body: String,
}

async fn add_message(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<MessageBody>, JsonRejection>,
) -> ApiResult<(StatusCode, ApiResponse<Issue>)> {
    let issue_id = parse_issue_id(&id)?;
    let Json(body) = payload?;
    let issue = state
        .issues
        .add_message(issue_id, &body.body, &principal)
        .await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(issue).with_message("Message added"),
    ))
}

async fn mark_messages_read(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<Issue>> {
    let issue_id = parse_issue_id(&id)?;
    Ok(ApiResponse::ok(
        state.issues.mark_messages_read(issue_id, &principal).await?,
    ))
}

async fn delete_issue(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<IssueDeletion>> {
    let issue_id = parse_issue_id(&id)?;
    let deletion = state.issues.delete_issue(issue_id, &principal).await?;
    Ok(ApiResponse::ok(deletion).with_message("Issue deleted"))
}

async fn edit_issue(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<ApiResponse<Issue>> {
    let issue_id = parse_issue_id(&id)?;
    let form = UploadForm::read(multipart, state.max_upload_bytes).await?;
    let mut patch = IssuePatch::new();
    if let Some(title) = form.text("title") {
        patch = patch.with_title(title);
    }
    if let Some(description) = form.text("description") {
        patch = patch.with_description(description);
    }
    let images = store_uploads(&*state.media, &form, ISSUE_IMAGE_FOLDER).await?;
    let request = EditIssueRequest::new(patch).with_images(images.clone());
    match state.issues.edit_issue(issue_id, request, &principal).await {
        Ok(issue) => Ok(ApiResponse::ok(issue).with_message("Issue updated")),
        Err(err) => {
            discard_uploads(&*state.media, &images).await;
            Err(err.into())
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TechnicianBody {
    technician_id: String,
}

async fn assign_technician(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<TechnicianBody>, JsonRejection>,
) -> ApiResult<ApiResponse<Issue>> {
    let issue_id = parse_issue_id(&id)?;
    let Json(body) = payload?;
    let technician = UserId::new(body.technician_id)?;
    let issue = state
        .issues
        .assign_technician(issue_id, technician, &principal)
        .await?;
    Ok(ApiResponse::ok(issue).with_message("Technician assigned"))
}

async fn remove_technician(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<Issue>> {
    let issue_id = parse_issue_id(&id)?;
    let issue = state.issues.remove_technician(issue_id, &principal).await?;
    Ok(ApiResponse::ok(issue).with_message("Technician removed"))
}
