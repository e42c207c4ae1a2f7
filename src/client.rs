//! Platform API client facade.
//!
//! Entry point for account-level data: fetches the account info once,
//! binds each project to its own regional endpoint, and manages SSH keys.

use serde_json::{json, Value};

use crate::connector::{Connector, RequestOptions};
use crate::error::{PlatformError, Result};
use crate::models::{Project, SshKey};
use crate::traits::{Create, Get, ResourceType};

const ACCOUNT_INFO_PATH: &str = "me";
const SSH_KEYS_PATH: &str = "ssh_keys";

/// High-level client for account, project and SSH key access.
///
/// # Example
///
/// ```no_run
/// use platformapi::PlatformClient;
///
/// # async fn example() -> platformapi::Result<()> {
/// let mut client = PlatformClient::from_env()?;
/// for project in client.projects(false).await? {
///     println!("{}", project.title().unwrap_or_default());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PlatformClient {
    connector: Connector,
    account_info: Option<Value>,
}

impl PlatformClient {
    /// Create a client around a connector bound to the accounts endpoint.
    pub fn new(connector: Connector) -> Self {
        Self {
            connector,
            account_info: None,
        }
    }

    /// Create a client from environment variables.
    ///
    /// See [`Connector::from_env`].
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Connector::from_env()?))
    }

    /// The accounts endpoint connector.
    pub fn connector(&self) -> &Connector {
        &self.connector
    }

    /// Account information for the authenticated user.
    ///
    /// Fetched on first use and kept until `reset` is passed.
    #[tracing::instrument(skip(self))]
    pub async fn account_info(&mut self, reset: bool) -> Result<&Value> {
        if reset || self.account_info.is_none() {
            let response = self
                .connector
                .get(ACCOUNT_INFO_PATH, RequestOptions::default())
                .await?;
            self.account_info = Some(Connector::json(response).await?);
        }
        Ok(self.account_info.get_or_insert(Value::Null))
    }

    /// The projects the user can access.
    ///
    /// Each project is a stub bound to a connector for its own `endpoint`.
    pub async fn projects(&mut self, reset: bool) -> Result<Vec<Project>> {
        let connector = self.connector.clone();
        let info = self.account_info(reset).await?;

        account_list(info, "projects")
            .iter()
            .map(|project| wrap_project(project.clone(), &connector))
            .collect()
    }

    /// Find an accessible project by ID.
    pub async fn project(&mut self, id: &str) -> Result<Option<Project>> {
        Ok(self
            .projects(false)
            .await?
            .into_iter()
            .find(|p| p.id() == Some(id)))
    }

    /// The SSH keys registered on the account.
    pub async fn ssh_keys(&mut self, reset: bool) -> Result<Vec<SshKey>> {
        let connector = self.connector.clone();
        let info = self.account_info(reset).await?;
        Ok(SshKey::wrap_collection(
            account_list(info, "ssh_keys").to_vec(),
            &connector,
        ))
    }

    /// Fetch a single SSH key.
    pub async fn ssh_key(&self, id: &str) -> Result<Option<SshKey>> {
        SshKey::get(&self.connector, SSH_KEYS_PATH, id).await
    }

    /// Register a new public SSH key.
    pub async fn add_ssh_key(&self, value: &str, title: Option<&str>) -> Result<SshKey> {
        let mut body = json!({ "value": value });
        if let Some(title) = title {
            body["title"] = json!(title);
        }
        SshKey::create(&self.connector, SSH_KEYS_PATH, body).await
    }
}

fn account_list<'a>(info: &'a Value, key: &str) -> &'a [Value] {
    info.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Wrap an account-info project entry with a connector for its endpoint.
///
/// Entries without a `self` link are linked to their endpoint so they can
/// be refreshed.
fn wrap_project(mut data: Value, connector: &Connector) -> Result<Project> {
    let Some(endpoint) = data.get("endpoint").and_then(Value::as_str).map(str::to_string) else {
        return Err(PlatformError::UnexpectedResponse(format!(
            "project {} has no endpoint",
            data.get("id").unwrap_or(&Value::Null)
        )));
    };

    let has_self = data
        .get("_links")
        .and_then(|links| links.get("self"))
        .is_some();
    if !has_self {
        if let Some(map) = data.as_object_mut() {
            let links = map.entry("_links").or_insert_with(|| json!({}));
            if let Some(links) = links.as_object_mut() {
                links.insert("self".to_string(), json!({ "href": endpoint }));
            }
        }
    }

    let project_connector = connector.with_base_url(&endpoint)?;
    Ok(Project::wrap(data, &project_connector))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connector() -> Connector {
        Connector::new("token", "https://accounts.example.com/api/platform/").unwrap()
    }

    #[test]
    fn test_wrap_project_binds_endpoint() {
        let project = wrap_project(
            json!({"id": "abc", "endpoint": "https://eu.example.com/api/projects/abc"}),
            &connector(),
        )
        .unwrap();

        assert_eq!(
            project.connector().base_url().as_str(),
            "https://eu.example.com/api/projects/abc/"
        );
        assert_eq!(
            project.uri(true).unwrap(),
            "https://eu.example.com/api/projects/abc"
        );
        assert!(!project.is_full());
    }

    #[test]
    fn test_wrap_project_keeps_existing_self_link() {
        let project = wrap_project(
            json!({
                "id": "abc",
                "endpoint": "https://eu.example.com/api/projects/abc",
                "_links": {"self": {"href": "https://eu.example.com/api/projects/abc/"}}
            }),
            &connector(),
        )
        .unwrap();
        assert_eq!(
            project.uri(false).unwrap(),
            "https://eu.example.com/api/projects/abc/"
        );
    }

    #[test]
    fn test_wrap_project_without_endpoint_fails() {
        let err = wrap_project(json!({"id": "abc"}), &connector()).unwrap_err();
        assert!(matches!(err, PlatformError::UnexpectedResponse(_)));
    }

    #[test]
    fn test_account_list_tolerates_missing_keys() {
        assert!(account_list(&json!({}), "projects").is_empty());
        assert_eq!(account_list(&json!({"ssh_keys": [1, 2]}), "ssh_keys").len(), 2);
    }
}
