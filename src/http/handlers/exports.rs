use crate::domain::user::{Role, User};
use crate::export::{csv, pdf};
use crate::http::handlers::analytics::{resolve_range, RangeQuery};
use crate::http::middleware::session_auth::require_role;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Extension;
use uuid::Uuid;

fn download(content_type: &'static str, filename: String, body: Vec<u8>) -> axum::response::Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

pub async fn test_results_csv(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(test_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    let snapshot = match state.tests.snapshot(&user, test_id).await {
        Ok(snapshot) => snapshot,
        Err(e) => return e.into_response(),
    };

    match csv::test_results_csv(&snapshot) {
        Ok(body) => download("text/csv", format!("ab_test_{test_id}.csv"), body),
        Err(e) => crate::service::error::ServiceError::Internal(e).into_response(),
    }
}

pub async fn test_results_pdf(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(test_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    let snapshot = match state.tests.snapshot(&user, test_id).await {
        Ok(snapshot) => snapshot,
        Err(e) => return e.into_response(),
    };

    download(
        "application/pdf",
        format!("ab_test_{test_id}.pdf"),
        pdf::test_results_pdf(&snapshot),
    )
}

pub async fn video_metrics_csv(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(video_id): Path<String>,
    Query(query): Query<RangeQuery>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    let (start, end) = match resolve_range(&query) {
        Ok(range) => range,
        Err(e) => return e.into_response(),
    };

    let rows = match state
        .analytics
        .export_rows(user.creator_scope(), &video_id, start, end)
        .await
    {
        Ok(rows) => rows,
        Err(e) => return e.into_response(),
    };

    match csv::video_metrics_csv(&video_id, &rows) {
        Ok(body) => download(
            "text/csv",
            format!("video_{video_id}_{start}_{end}.csv"),
            body,
        ),
        Err(e) => crate::service::error::ServiceError::Internal(e).into_response(),
    }
}
