//! Mock Platform API server.
//!
//! Provides an axum-based HTTP server that simulates the Platform API.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers::{self, SharedState};
use super::state::MockState;

/// A mock Platform API server for testing.
///
/// The server runs in the background and serves both the accounts API
/// (`/me`, `/ssh_keys`) and the project API (`/api/projects/...`) on the
/// same address.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: SharedState,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(mut state: MockState) -> Self {
        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        // Project endpoints are absolute, so the state needs to know where it is served
        let url = format!("http://{}", addr);
        state.base_url = url.clone();

        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Server error");
        });

        Self {
            url,
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL when creating a `Connector` for the accounts API.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> SharedState {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    fn default_state() -> MockState {
        let scenario = Fixtures::default_scenario();
        Self::state_from_scenario(scenario)
    }

    /// Create state from a scenario.
    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new();

        if let Some(account) = scenario.account.as_object() {
            for (key, value) in account {
                state = state.with_account_field(key, value.clone());
            }
        }

        for project in scenario.projects {
            state = state.with_project(project);
        }

        for (project, env) in scenario.environments {
            state = state.with_environment(&project, env);
        }

        for (project, activity) in scenario.activities {
            state = state.with_activity(&project, activity);
        }

        for (project, domain) in scenario.domains {
            state = state.with_domain(&project, domain);
        }

        for key in scenario.ssh_keys {
            state = state.with_ssh_key(key);
        }

        state
    }

    /// Create the axum router with all routes.
    fn create_router(state: SharedState) -> Router {
        Router::new()
            // Accounts routes
            .route("/me", get(handlers::get_account))
            .route("/ssh_keys", post(handlers::create_ssh_key))
            .route(
                "/ssh_keys/:id",
                get(handlers::get_ssh_key).delete(handlers::delete_ssh_key),
            )
            // Project routes
            .route(
                "/api/projects/:project",
                get(handlers::get_project).patch(handlers::update_project),
            )
            // Environment routes
            .route(
                "/api/projects/:project/environments",
                get(handlers::list_environments),
            )
            .route(
                "/api/projects/:project/environments/:id",
                get(handlers::get_environment).patch(handlers::update_environment),
            )
            .route(
                "/api/projects/:project/environments/:id/:operation",
                post(handlers::run_environment_operation),
            )
            // Activity routes
            .route(
                "/api/projects/:project/activities",
                get(handlers::list_activities),
            )
            .route(
                "/api/projects/:project/activities/:id",
                get(handlers::get_activity),
            )
            // Domain routes
            .route(
                "/api/projects/:project/domains",
                get(handlers::list_domains).post(handlers::create_domain),
            )
            .route(
                "/api/projects/:project/domains/:name",
                get(handlers::get_domain).delete(handlers::delete_domain),
            )
            .layer(middleware::from_fn_with_state(state.clone(), require_token))
            // Health check (unauthenticated)
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Reject requests without the configured bearer token.
async fn require_token(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    let required = state.read().await.required_token.clone();

    if let Some(token) = required {
        let expected = format!("Bearer {}", token);
        let provided = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        if provided != Some(expected.as_str()) {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Unauthorized",
                    "message": "Invalid or missing bearer token"
                })),
            )
                .into_response();
        }
    }

    next.run(request).await
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Connector, PlatformClient};
    use axum::body::Body;
    use axum::http;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        // Server should be accessible
        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/health", server.url()))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_router_serves_account_info() {
        let state = MockServer::default_state().shared();
        let app = MockServer::create_router(state);

        let response = app
            .oneshot(http::Request::builder().uri("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_router_enforces_token() {
        let state = MockState::new().with_required_token("secret").shared();
        let app = MockServer::create_router(state);

        let denied = app
            .clone()
            .oneshot(http::Request::builder().uri("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

        let allowed = app
            .oneshot(
                http::Request::builder()
                    .uri("/me")
                    .header(AUTHORIZATION, "Bearer secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(allowed.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_projects_with_platform_client() {
        let server = MockServer::start().await;
        let connector = Connector::new("test-token", server.url()).unwrap();
        let mut client = PlatformClient::new(connector);

        let projects = client.projects(false).await.expect("Failed to list projects");

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].title(), Some("Shop"));

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_server() {
        let server = MockServer::start_empty().await;
        let connector = Connector::new("test-token", server.url()).unwrap();
        let mut client = PlatformClient::new(connector);

        assert!(client.projects(false).await.unwrap().is_empty());
        assert!(client.ssh_key("1").await.unwrap().is_none());

        server.shutdown().await;
    }
}
