//! Activity endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::{not_found, SharedState};

/// Query parameters for listing activities.
#[derive(Debug, Default, Deserialize)]
pub struct ListActivitiesQuery {
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
}

/// GET /api/projects/{project}/activities
pub async fn list_activities(
    State(state): State<SharedState>,
    Path(project): Path<String>,
    Query(query): Query<ListActivitiesQuery>,
) -> impl IntoResponse {
    let state = state.read().await;

    if !state.projects.contains_key(&project) {
        return not_found("project", &project);
    }

    let activities = state.list_activities(&project, query.activity_type.as_deref());
    (StatusCode::OK, Json(Value::Array(activities))).into_response()
}

/// GET /api/projects/{project}/activities/{id}
///
/// Every read of an unfinished activity completes it, so a client polling
/// for completion finishes after one refresh.
pub async fn get_activity(
    State(state): State<SharedState>,
    Path((project, id)): Path<(String, String)>,
) -> impl IntoResponse {
    let mut state = state.write().await;

    match state.poll_activity(&project, &id) {
        Some(activity) => (StatusCode::OK, Json(activity)).into_response(),
        None => not_found("activity", &id),
    }
}
