//! Mock Platform API server for E2E testing.
//!
//! This module provides an in-memory mock server that speaks the HAL dialect
//! of the Platform API: account info, projects on their own endpoints,
//! environments whose `#`-links depend on their status, and activities.
//! Unlike wiremock, which mocks at the HTTP level per-test, this server
//! maintains state across requests, enabling realistic workflow testing.
//!
//! # Example
//!
//! ```ignore
//! use platformapi::mock_server::MockServer;
//! use platformapi::{Connector, PlatformClient};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let connector = Connector::new("test-token", server.url()).unwrap();
//!     let mut client = PlatformClient::new(connector);
//!
//!     // Server comes with default fixtures
//!     let projects = client.projects(false).await.unwrap();
//!     assert_eq!(projects.len(), 2);
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::MockState;
