//! Environment endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Map, Value};

use super::{bad_request, not_found, SharedState};
use crate::mock_server::fixtures::Fixtures;

/// GET /api/projects/{project}/environments
pub async fn list_environments(
    State(state): State<SharedState>,
    Path(project): Path<String>,
) -> impl IntoResponse {
    let state = state.read().await;

    if !state.projects.contains_key(&project) {
        return not_found("project", &project);
    }

    let environments: Vec<Value> = state
        .environments
        .get(&project)
        .map(|envs| {
            envs.keys()
                .filter_map(|id| state.hal_environment(&project, id))
                .collect()
        })
        .unwrap_or_default();

    (StatusCode::OK, Json(Value::Array(environments))).into_response()
}

/// GET /api/projects/{project}/environments/{id}
pub async fn get_environment(
    State(state): State<SharedState>,
    Path((project, id)): Path<(String, String)>,
) -> impl IntoResponse {
    let state = state.read().await;

    match state.hal_environment(&project, &id) {
        Some(env) => (StatusCode::OK, Json(env)).into_response(),
        None => not_found("environment", &id),
    }
}

/// PATCH /api/projects/{project}/environments/{id}
///
/// Unlike projects, the response does not echo the entity.
pub async fn update_environment(
    State(state): State<SharedState>,
    Path((project, id)): Path<(String, String)>,
    Json(values): Json<Map<String, Value>>,
) -> impl IntoResponse {
    let mut state = state.write().await;

    if state.update_environment(&project, &id, &values) {
        (StatusCode::OK, Json(json!({"status": "OK", "code": 200}))).into_response()
    } else {
        not_found("environment", &id)
    }
}

/// POST /api/projects/{project}/environments/{id}/{operation}
///
/// Applies the operation and answers with the started activity embedded.
pub async fn run_environment_operation(
    State(state): State<SharedState>,
    Path((project, id, operation)): Path<(String, String, String)>,
    body: Option<Json<Value>>,
) -> impl IntoResponse {
    let mut state = state.write().await;

    let Some(env) = state.hal_environment(&project, &id) else {
        return not_found("environment", &id);
    };
    if env["_links"].get(format!("#{operation}")).is_none() {
        return bad_request(format!(
            "Operation '{}' is not available on environment '{}'",
            operation, id
        ));
    }

    let body = body.map(|Json(b)| b).unwrap_or(Value::Null);
    let mut status_change = None;

    match operation.as_str() {
        "activate" => status_change = Some("active"),
        "deactivate" => status_change = Some("inactive"),
        "branch" => {
            let Some(name) = body.get("name").and_then(Value::as_str) else {
                return bad_request("Missing: name");
            };
            if state
                .environments
                .get(&project)
                .map_or(false, |envs| envs.contains_key(name))
            {
                return bad_request(format!("Environment '{}' already exists", name));
            }
            let mut child = Fixtures::environment(name, Some(id.as_str()), "active");
            if let Some(title) = body.get("title") {
                child["title"] = title.clone();
            }
            state
                .environments
                .entry(project.clone())
                .or_default()
                .insert(name.to_string(), child);
        }
        "synchronize" => {
            let data = body.get("synchronize_data").and_then(Value::as_bool) == Some(true);
            let code = body.get("synchronize_code").and_then(Value::as_bool) == Some(true);
            if !data && !code {
                return bad_request("Nothing to synchronize");
            }
        }
        _ => {}
    }

    if let Some(status) = status_change {
        let mut values = Map::new();
        values.insert("status".to_string(), json!(status));
        state.update_environment(&project, &id, &values);
    }

    let activity = state.start_activity(
        &project,
        &format!("environment.{}", operation),
        format!("{} on environment {}", operation, id),
    );

    (
        StatusCode::ACCEPTED,
        Json(json!({
            "status": "OK",
            "code": 202,
            "_embedded": {"activities": [activity]}
        })),
    )
        .into_response()
}
