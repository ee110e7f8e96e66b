use crate::abtest::winner::WinnerCheck;
use crate::domain::user::{Role, User};
use crate::http::middleware::session_auth::require_role;
use crate::service::test_engine::NewTest;
use crate::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use uuid::Uuid;

#[derive(Debug, serde::Deserialize)]
pub struct StopRequest {
    pub winner_variant_id: Option<Uuid>,
}

#[derive(Debug, serde::Deserialize)]
pub struct SelectWinnerRequest {
    pub variant_id: Uuid,
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(req): Json<NewTest>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    match state.tests.create(&user, req).await {
        Ok(test) => (axum::http::StatusCode::CREATED, Json(test)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    match state.tests.list(&user).await {
        Ok(tests) => Json(tests).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn status(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(test_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    match state.tests.snapshot(&user, test_id).await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn start(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(test_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    match state.tests.start(&user, test_id).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn pause(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(test_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    match state.tests.pause(&user, test_id).await {
        Ok(test) => Json(test).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn resume(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(test_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    match state.tests.resume(&user, test_id).await {
        Ok(test) => Json(test).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn stop(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(test_id): Path<Uuid>,
    Json(req): Json<StopRequest>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    match state.tests.stop(&user, test_id, req.winner_variant_id).await {
        Ok(test) => Json(test).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn logs(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(test_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    match state.tests.logs(&user, test_id).await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn results(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(test_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    match state.tests.results(&user, test_id).await {
        Ok(points) => Json(points).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Manual rotation, the same path the rotation worker takes on its cadence.
pub async fn rotate(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(test_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    if let Err(e) = state.tests.owned(&user, test_id).await {
        return e.into_response();
    }
    match state.scheduler.rotate(Some(user.user_id), test_id).await {
        Ok(variant) => Json(variant).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn winner_check(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(test_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    let test = match state.tests.owned(&user, test_id).await {
        Ok(test) => test,
        Err(e) => return e.into_response(),
    };
    match state.winner.check(&test).await {
        Ok(verdict) => {
            let body = match verdict {
                WinnerCheck::Winner(variant_id) => serde_json::json!({
                    "has_winner": true,
                    "variant_id": variant_id,
                }),
                WinnerCheck::NotEnoughVariants => serde_json::json!({
                    "has_winner": false,
                    "reason": "not enough variants",
                }),
                WinnerCheck::InsufficientData => serde_json::json!({
                    "has_winner": false,
                    "reason": "variants need more impressions",
                }),
                WinnerCheck::BelowThreshold => serde_json::json!({
                    "has_winner": false,
                    "reason": "no variant clears the performance threshold",
                }),
            };
            Json(body).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn winner_select(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(test_id): Path<Uuid>,
    Json(req): Json<SelectWinnerRequest>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    let test = match state.tests.owned(&user, test_id).await {
        Ok(test) => test,
        Err(e) => return e.into_response(),
    };
    match state
        .winner
        .select(Some(user.user_id), &test, req.variant_id)
        .await
    {
        Ok(()) => Json(serde_json::json!({"selected": true})).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Pushes the stored winner permanently; used for manual retry after a failed
/// automatic application.
pub async fn winner_apply(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(test_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    let test = match state.tests.owned(&user, test_id).await {
        Ok(test) => test,
        Err(e) => return e.into_response(),
    };
    match state.winner.apply(Some(user.user_id), &test).await {
        Ok(variant) => Json(variant).into_response(),
        Err(e) => e.into_response(),
    }
}
