//! Project endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Map, Value};

use super::{not_found, SharedState};

/// GET /api/projects/{id}
pub async fn get_project(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let state = state.read().await;

    match state.hal_project(&id) {
        Some(project) => (StatusCode::OK, Json(project)).into_response(),
        None => not_found("project", &id),
    }
}

/// PATCH /api/projects/{id}
///
/// Echoes the updated project under `_embedded.entity`.
pub async fn update_project(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(values): Json<Map<String, Value>>,
) -> impl IntoResponse {
    let mut state = state.write().await;

    match state.update_project(&id, &values) {
        Some(project) => (
            StatusCode::OK,
            Json(json!({
                "status": "OK",
                "code": 200,
                "_embedded": {"entity": project}
            })),
        )
            .into_response(),
        None => not_found("project", &id),
    }
}
