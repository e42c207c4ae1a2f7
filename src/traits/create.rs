//! Create trait for adding resources to a collection.

use async_trait::async_trait;
use serde_json::Value;

use crate::connector::Connector;
use crate::error::{PlatformError, Result};
use crate::resource::Resource;
use crate::traits::ResourceType;

/// Create a new resource.
///
/// The body is checked against [`ResourceType::REQUIRED`] first; an
/// incomplete body fails without sending a request.
///
/// # Example
///
/// ```ignore
/// use platformapi::{Create, SshKey};
///
/// let key = SshKey::create(&connector, "ssh_keys", json!({"value": "ssh-ed25519 AAAA..."})).await?;
/// ```
#[async_trait]
pub trait Create: ResourceType {
    /// POST `body` to `collection_url` and wrap the response as a full resource.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Validation`] if required properties are
    /// missing, or an error if the request fails.
    async fn create(connector: &Connector, collection_url: &str, body: Value) -> Result<Self> {
        let missing = Self::check(&body);
        if !missing.is_empty() {
            return Err(PlatformError::Validation { missing });
        }
        tracing::debug!(entity = Self::NAME, url = collection_url, "creating resource");

        let response = connector.post(collection_url, body).await?;
        let data = Connector::json(response).await?;

        Ok(Self::from_resource(Resource::full(
            data,
            connector.clone(),
        )))
    }
}

impl Create for Resource {}
