//! Domain endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{Map, Value};

use super::{bad_request, not_found, SharedState};

/// GET /api/projects/{project}/domains
pub async fn list_domains(
    State(state): State<SharedState>,
    Path(project): Path<String>,
) -> impl IntoResponse {
    let state = state.read().await;

    if !state.projects.contains_key(&project) {
        return not_found("project", &project);
    }

    let domains: Vec<Value> = state
        .domains
        .get(&project)
        .map(|domains| {
            domains
                .keys()
                .filter_map(|name| state.hal_domain(&project, name))
                .collect()
        })
        .unwrap_or_default();

    (StatusCode::OK, Json(Value::Array(domains))).into_response()
}

/// GET /api/projects/{project}/domains/{name}
pub async fn get_domain(
    State(state): State<SharedState>,
    Path((project, name)): Path<(String, String)>,
) -> impl IntoResponse {
    let state = state.read().await;

    match state.hal_domain(&project, &name) {
        Some(domain) => (StatusCode::OK, Json(domain)).into_response(),
        None => not_found("domain", &name),
    }
}

/// POST /api/projects/{project}/domains
pub async fn create_domain(
    State(state): State<SharedState>,
    Path(project): Path<String>,
    Json(mut body): Json<Map<String, Value>>,
) -> impl IntoResponse {
    let Some(name) = body.get("name").and_then(Value::as_str).map(str::to_string) else {
        return bad_request("Missing: name");
    };

    let mut state = state.write().await;

    if !state.projects.contains_key(&project) {
        return not_found("project", &project);
    }
    if state
        .domains
        .get(&project)
        .map_or(false, |d| d.contains_key(&name))
    {
        return (
            StatusCode::CONFLICT,
            Json(serde_json::json!({
                "error": "Conflict",
                "message": format!("Domain '{}' already exists", name)
            })),
        )
            .into_response();
    }

    body.entry("ssl")
        .or_insert_with(|| serde_json::json!({"has_certificate": false}));
    state
        .domains
        .entry(project.clone())
        .or_default()
        .insert(name.clone(), Value::Object(body));

    match state.hal_domain(&project, &name) {
        Some(domain) => (StatusCode::CREATED, Json(domain)).into_response(),
        None => not_found("domain", &name),
    }
}

/// DELETE /api/projects/{project}/domains/{name}
pub async fn delete_domain(
    State(state): State<SharedState>,
    Path((project, name)): Path<(String, String)>,
) -> impl IntoResponse {
    let mut state = state.write().await;

    let removed = state
        .domains
        .get_mut(&project)
        .and_then(|d| d.remove(&name));

    match removed {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found("domain", &name),
    }
}
