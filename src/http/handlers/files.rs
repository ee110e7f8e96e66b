use crate::domain::user::User;
use crate::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Extension, Json};

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> impl IntoResponse {
    match state.drive.list(user.creator_scope()).await {
        Ok(files) => {
            let files: Vec<serde_json::Value> = files
                .into_iter()
                .map(|f| {
                    serde_json::json!({
                        "id": f.id,
                        "file_id": f.file_id,
                        "name": f.name,
                        "mime_type": f.mime_type,
                        "size": f.size,
                        "size_display": f.size_display(),
                        "modified_time": f.modified_time,
                        "web_view_link": f.web_view_link,
                        "cached_at": f.cached_at,
                    })
                })
                .collect();
            Json(files).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn sync(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> impl IntoResponse {
    match state.drive.sync(user.creator_scope()).await {
        Ok(count) => Json(serde_json::json!({"synced": count})).into_response(),
        Err(e) => e.into_response(),
    }
}
