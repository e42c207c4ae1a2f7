//! Platform API client library.
//!
//! A Rust library for hypermedia (HAL) driven REST APIs. Every entity is a
//! [`Resource`]: a read-only property bag plus the `_links` and `_embedded`
//! metadata the server sends with it. What can be done to a resource is
//! discovered from its `#`-prefixed links rather than fixed per type.
//!
//! # Quick Start
//!
//! ```no_run
//! use platformapi::PlatformClient;
//!
//! #[tokio::main]
//! async fn main() -> platformapi::Result<()> {
//!     // Create client from environment variables
//!     let mut client = PlatformClient::from_env()?;
//!
//!     // Projects come from the account info, each bound to its own endpoint
//!     for project in client.projects(false).await? {
//!         println!("Project: {}", project.title().unwrap_or_default());
//!
//!         for mut env in project.environments(None).await? {
//!             // Collection items are stubs; fetch the full record on demand
//!             env.ensure_full().await?;
//!             if env.operation_available("backup") {
//!                 let mut activity = env.backup().await?;
//!                 activity
//!                     .wait(std::time::Duration::from_secs(1), |_| {})
//!                     .await?;
//!             }
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`Connector`] - transport handle (base URL + token); [`Connector::send`]
//!   translates every failed response into [`PlatformError::Api`]
//! - [`Resource`] - the property bag and all instance operations
//!   (refresh, update, delete, run operations, link resolution)
//! - [`ResourceType`] - implemented by each variant ([`Project`],
//!   [`Environment`], [`Activity`], [`SshKey`], [`Domain`]); provides
//!   wrapping and create-time validation
//! - [`Get`], [`List`], [`Create`] - type-level fetch and create operations,
//!   implemented by the variants whose endpoints support them
//! - [`PlatformClient`] - account-level facade
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `PLATFORM_API_TOKEN` (required) - Bearer token
//! - `PLATFORM_ACCOUNTS_URL` (optional) - Accounts API base URL (defaults to
//!   `https://accounts.platform.sh/api/platform/`)

mod client;
mod connector;
mod error;
mod models;
mod resource;
mod traits;

pub mod cli;
pub mod output;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::PlatformClient;
pub use connector::{Connector, RequestOptions};
pub use error::{PlatformError, Result};
pub use resource::{is_reserved, Resource, RESERVED_KEYS};

// Re-export traits
pub use traits::{Create, Get, List, ResourceType};

// Re-export models
pub use models::{
    Activity, Domain, Environment, Project, SshKey, STATE_COMPLETE, STATE_IN_PROGRESS,
    STATE_PENDING,
};

// Re-export output formatting
pub use output::PrettyPrint;

pub use reqwest::Method;
