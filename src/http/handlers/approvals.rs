use crate::domain::approval::ApprovalStatus;
use crate::domain::user::{Role, User};
use crate::http::middleware::session_auth::require_role;
use crate::service::error::ServiceError;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use uuid::Uuid;

#[derive(Debug, serde::Deserialize)]
pub struct SubmitRequest {
    pub file_id: Uuid,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct ReviewRequest {
    pub approve: bool,
    pub rejection_reason: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct UploadRequestBody {
    pub privacy_status: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

pub async fn submit(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(req): Json<SubmitRequest>,
) -> impl IntoResponse {
    match state
        .approvals
        .submit(&user, req.file_id, &req.description)
        .await
    {
        Ok(request) => (axum::http::StatusCode::CREATED, Json(request)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let status = match query.status.as_deref() {
        Some(value) => match ApprovalStatus::parse(value) {
            Some(status) => Some(status),
            None => {
                return ServiceError::Validation(format!("unknown status '{value}'"))
                    .into_response()
            }
        },
        None => None,
    };

    match state.approvals.list_for_actor(&user, status).await {
        Ok(requests) => Json(requests).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn review(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(request_id): Path<Uuid>,
    Json(req): Json<ReviewRequest>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    match state
        .approvals
        .review(&user, request_id, req.approve, req.rejection_reason)
        .await
    {
        Ok(request) => Json(request).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn upload(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(request_id): Path<Uuid>,
    Json(req): Json<UploadRequestBody>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    match state
        .approvals
        .upload(&user, request_id, req.privacy_status)
        .await
    {
        Ok(uploaded) => Json(uploaded).into_response(),
        Err(e) => e.into_response(),
    }
}
