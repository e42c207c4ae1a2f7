//! HTTP request handlers for the mock server.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;

pub mod account;
pub mod activities;
pub mod domains;
pub mod environments;
pub mod projects;
pub mod ssh_keys;

pub use account::*;
pub use activities::*;
pub use domains::*;
pub use environments::*;
pub use projects::*;
pub use ssh_keys::*;

/// State shared by all handlers.
pub type SharedState = Arc<RwLock<MockState>>;

/// 404 with an API-style error body.
pub(crate) fn not_found(what: &str, id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not found",
            "message": format!("No {} found with ID: {}", what, id)
        })),
    )
        .into_response()
}

/// 400 with an API-style error body.
pub(crate) fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "Bad request",
            "message": message.into()
        })),
    )
        .into_response()
}
