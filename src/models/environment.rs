//! Environment resource.

use std::ops::{Deref, DerefMut};

use reqwest::Method;
use serde::Serialize;
use serde_json::json;

use crate::error::{PlatformError, Result};
use crate::models::Activity;
use crate::resource::Resource;
use crate::traits::{Get, List, ResourceType};

/// An environment (a deployed branch) of a project.
///
/// Lifecycle actions such as branching or merging start background
/// activities; whether an action is allowed right now is advertised by the
/// server through `#`-links, see [`Resource::operation_available`].
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Environment(Resource);

impl ResourceType for Environment {
    const NAME: &'static str = "Environment";

    fn from_resource(resource: Resource) -> Self {
        Self(resource)
    }

    fn resource(&self) -> &Resource {
        &self.0
    }
}

impl Get for Environment {}
impl List for Environment {}

impl Deref for Environment {
    type Target = Resource;

    fn deref(&self) -> &Resource {
        &self.0
    }
}

impl DerefMut for Environment {
    fn deref_mut(&mut self) -> &mut Resource {
        &mut self.0
    }
}

impl Environment {
    pub fn id(&self) -> Option<&str> {
        self.str_property("id")
    }

    pub fn title(&self) -> Option<&str> {
        self.str_property("title")
    }

    pub fn status(&self) -> Option<&str> {
        self.str_property("status")
    }

    pub fn is_active(&self) -> bool {
        self.status() == Some("active")
    }

    /// ID of the parent environment; `None` for the root.
    pub fn parent(&self) -> Option<&str> {
        self.str_property("parent")
    }

    /// The public URL of the deployed site.
    pub fn public_url(&self) -> Result<String> {
        self.link("public-url", true)
    }

    /// SSH address in `user@host` form.
    pub fn ssh_url(&self) -> Result<String> {
        let url = self.link("ssh", false)?;
        let url = url.strip_prefix("ssh://").unwrap_or(&url);
        Ok(url.trim_end_matches('/').to_string())
    }

    /// Derive an environment machine name from a title.
    ///
    /// Lowercases, turns spaces into dashes and drops anything that is not
    /// alphanumeric or a dash.
    pub fn sanitize_id(title: &str) -> String {
        title
            .to_lowercase()
            .replace(' ', "-")
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect()
    }

    /// Branch a new child environment.
    ///
    /// The machine name defaults to [`Environment::sanitize_id`] of `title`.
    pub async fn branch(&self, title: &str, id: Option<&str>) -> Result<Activity> {
        let id = id.map_or_else(|| Self::sanitize_id(title), str::to_string);
        let body = json!({ "name": id, "title": title });
        self.run_long_operation("branch", Method::POST, Some(body)).await
    }

    pub async fn activate(&self) -> Result<Activity> {
        self.run_long_operation("activate", Method::POST, None).await
    }

    pub async fn deactivate(&self) -> Result<Activity> {
        self.run_long_operation("deactivate", Method::POST, None).await
    }

    /// Merge into the parent environment.
    pub async fn merge(&self) -> Result<Activity> {
        self.run_long_operation("merge", Method::POST, None).await
    }

    /// Copy data and/or code down from the parent environment.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::InvalidArgument`] if neither is requested.
    pub async fn synchronize(&self, data: bool, code: bool) -> Result<Activity> {
        if !data && !code {
            return Err(PlatformError::InvalidArgument(
                "nothing to synchronize: choose data, code or both".to_string(),
            ));
        }
        let body = json!({ "synchronize_data": data, "synchronize_code": code });
        self.run_long_operation("synchronize", Method::POST, Some(body))
            .await
    }

    /// Take a snapshot of the environment.
    pub async fn backup(&self) -> Result<Activity> {
        self.run_long_operation("backup", Method::POST, None).await
    }
}
