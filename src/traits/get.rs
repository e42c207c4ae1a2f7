//! Get trait for fetching single resources.

use async_trait::async_trait;

use crate::connector::{Connector, RequestOptions};
use crate::error::Result;
use crate::resource::Resource;
use crate::traits::ResourceType;

/// Fetch a single resource by ID.
///
/// # Example
///
/// ```ignore
/// use platformapi::{Connector, Get, SshKey};
///
/// let connector = Connector::from_env()?;
/// let key = SshKey::get(&connector, "ssh_keys", "1234").await?;
/// ```
#[async_trait]
pub trait Get: ResourceType {
    /// Fetch the resource at `collection_url/id`.
    ///
    /// If `collection_url` is empty, `id` is used as the full URL. The result
    /// is a full representation.
    ///
    /// Returns `Ok(None)` when the server answers 404.
    ///
    /// # Errors
    ///
    /// Returns an error for any other failed request.
    async fn get(connector: &Connector, collection_url: &str, id: &str) -> Result<Option<Self>> {
        let url = item_url(collection_url, id);
        tracing::debug!(entity = Self::NAME, %url, "fetching resource");

        let response = match connector.get(&url, RequestOptions::default()).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };
        let data = Connector::json(response).await?;

        Ok(Some(Self::from_resource(Resource::full(
            data,
            connector.clone(),
        ))))
    }
}

/// Join a collection URL and an item ID.
pub(crate) fn item_url(collection_url: &str, id: &str) -> String {
    if collection_url.is_empty() {
        return id.to_string();
    }
    format!(
        "{}/{}",
        collection_url.trim_end_matches('/'),
        urlencoding::encode(id)
    )
}

impl Get for Resource {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_url_joins_and_encodes() {
        assert_eq!(item_url("ssh_keys", "12"), "ssh_keys/12");
        assert_eq!(item_url("ssh_keys/", "12"), "ssh_keys/12");
        assert_eq!(
            item_url("https://example.com/api/projects", "a b/c"),
            "https://example.com/api/projects/a%20b%2Fc"
        );
    }

    #[test]
    fn test_item_url_without_collection_uses_id() {
        assert_eq!(
            item_url("", "https://example.com/api/projects/p1"),
            "https://example.com/api/projects/p1"
        );
    }
}
