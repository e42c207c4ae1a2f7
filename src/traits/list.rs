//! List trait for fetching collections of resources.

use async_trait::async_trait;
use serde_json::Value;

use crate::connector::{Connector, RequestOptions};
use crate::error::{PlatformError, Result};
use crate::resource::Resource;
use crate::traits::ResourceType;

/// Fetch a collection of resources.
///
/// The API has no page-size parameter, so `limit` is applied client-side:
/// the whole collection is fetched and then truncated. This is not
/// pagination and does not reduce the transfer.
///
/// # Example
///
/// ```ignore
/// use platformapi::{Environment, List, RequestOptions};
///
/// let envs = Environment::get_collection(
///     &connector,
///     "https://eu.platform.sh/api/projects/abc/environments",
///     Some(10),
///     RequestOptions::default(),
/// ).await?;
/// ```
#[async_trait]
pub trait List: ResourceType {
    /// Fetch the collection at `url`, keeping at most `limit` items.
    ///
    /// Items are stubs; call `ensure_full` on those that need complete data.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a JSON array.
    async fn get_collection(
        connector: &Connector,
        url: &str,
        limit: Option<usize>,
        options: RequestOptions,
    ) -> Result<Vec<Self>> {
        tracing::debug!(entity = Self::NAME, %url, ?limit, "fetching collection");

        let response = connector.get(url, options).await?;
        let mut items = match Connector::json(response).await? {
            Value::Array(items) => items,
            _ => {
                return Err(PlatformError::UnexpectedResponse(format!(
                    "expected a JSON array of {} from {url}",
                    Self::NAME
                )))
            }
        };

        if let Some(limit) = limit {
            items.truncate(limit);
        }

        Ok(Self::wrap_collection(items, connector))
    }
}

impl List for Resource {}
