use crate::domain::user::User;
use crate::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Extension, Json};

/// One-call summary backing the landing screen.
pub async fn summary(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> impl IntoResponse {
    let creator_id = user.creator_scope();

    let file_count = state.drive_files_repo.count(creator_id).await;
    let approvals = state.approvals_repo.counts_by_status(creator_id).await;
    let tests = state.abtests_repo.counts_by_status(creator_id).await;
    let integrations = state.integrations.statuses(creator_id).await;

    match (file_count, approvals, tests, integrations) {
        (Ok(file_count), Ok(approvals), Ok(tests), Ok(integrations)) => Json(serde_json::json!({
            "file_count": file_count,
            "approvals_by_status": counts_object(approvals),
            "tests_by_status": counts_object(tests),
            "integrations": integrations,
        }))
        .into_response(),
        (Err(e), _, _, _) | (_, Err(e), _, _) | (_, _, Err(e), _) => {
            crate::service::error::ServiceError::Internal(e).into_response()
        }
        (_, _, _, Err(e)) => e.into_response(),
    }
}

fn counts_object(counts: Vec<(String, i64)>) -> serde_json::Value {
    let mut object = serde_json::Map::new();
    for (status, count) in counts {
        object.insert(status, serde_json::Value::from(count));
    }
    serde_json::Value::Object(object)
}
