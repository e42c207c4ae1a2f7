//! SSH key endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{Map, Value};

use super::{bad_request, not_found, SharedState};

/// GET /ssh_keys/{id}
pub async fn get_ssh_key(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    let state = state.read().await;

    match state.hal_ssh_key(id) {
        Some(key) => (StatusCode::OK, Json(key)).into_response(),
        None => not_found("SSH key", &id.to_string()),
    }
}

/// POST /ssh_keys
pub async fn create_ssh_key(
    State(state): State<SharedState>,
    Json(body): Json<Map<String, Value>>,
) -> impl IntoResponse {
    if !body.get("value").map_or(false, Value::is_string) {
        return bad_request("Missing: value");
    }

    let mut state = state.write().await;
    let id = state.add_ssh_key(body);

    match state.hal_ssh_key(id) {
        Some(key) => (StatusCode::CREATED, Json(key)).into_response(),
        None => not_found("SSH key", &id.to_string()),
    }
}

/// DELETE /ssh_keys/{id}
pub async fn delete_ssh_key(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    let mut state = state.write().await;

    match state.ssh_keys.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found("SSH key", &id.to_string()),
    }
}
