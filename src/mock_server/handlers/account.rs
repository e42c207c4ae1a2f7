//! Account endpoint handlers.

use axum::{extract::State, response::IntoResponse, Json};

use super::SharedState;

/// GET /me
pub async fn get_account(State(state): State<SharedState>) -> impl IntoResponse {
    let state = state.read().await;
    Json(state.account_info())
}
