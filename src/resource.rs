//! Generic hypermedia resource.
//!
//! A [`Resource`] is a read-only property bag wrapped around a HAL payload.
//! Top-level keys `_links` and `_embedded` are metadata; every other key is a
//! property. Operations are discovered per instance from `#`-prefixed links.

use std::ops::Index;

use reqwest::Method;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::connector::{Connector, RequestOptions};
use crate::error::{PlatformError, Result};
use crate::models::Activity;
use crate::traits::ResourceType;

const LINKS_KEY: &str = "_links";
const EMBEDDED_KEY: &str = "_embedded";
const FULL_KEY: &str = "_full";

/// Top-level keys that are never exposed as properties.
pub const RESERVED_KEYS: [&str; 3] = [LINKS_KEY, EMBEDDED_KEY, FULL_KEY];

/// Whether `name` is a reserved metadata key.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_KEYS.contains(&name)
}

/// An API entity: properties plus links and embedded data.
///
/// A resource is either *full* (fetched by ID or refreshed) or a *stub*
/// (e.g. an element of a collection). Reading properties never fetches;
/// call [`Resource::ensure_full`] when complete data is required.
///
/// There is no way to write a property. Server state changes only through
/// [`update`](Resource::update), [`delete`](Resource::delete) or a custom
/// operation, and the local map is replaced from the response.
#[derive(Debug, Clone)]
pub struct Resource {
    data: Map<String, Value>,
    is_full: bool,
    connector: Connector,
}

impl Resource {
    /// Wrap a raw JSON object. Never issues a request.
    ///
    /// A `_full: true` key marks the instance as full and is removed from
    /// the data; it is a client-side flag only.
    pub fn new(data: Value, connector: Connector) -> Self {
        let (data, is_full) = split_full_flag(data);
        Self {
            data,
            is_full,
            connector,
        }
    }

    /// Wrap a payload known to be the complete representation.
    pub(crate) fn full(data: Value, connector: Connector) -> Self {
        let mut resource = Self::new(data, connector);
        resource.is_full = true;
        resource
    }

    /// The raw data, including `_links` and `_embedded`.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// The transport this resource issues requests through.
    pub fn connector(&self) -> &Connector {
        &self.connector
    }

    /// Whether this instance holds the complete server representation.
    pub fn is_full(&self) -> bool {
        self.is_full
    }

    /// Get a property value.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::PropertyNotFound`] if the property is absent
    /// or `name` is a reserved metadata key.
    pub fn property(&self, name: &str) -> Result<&Value> {
        if is_reserved(name) {
            return Err(PlatformError::PropertyNotFound(name.to_string()));
        }
        self.data
            .get(name)
            .ok_or_else(|| PlatformError::PropertyNotFound(name.to_string()))
    }

    /// Whether a (non-reserved) property exists.
    pub fn has_property(&self, name: &str) -> bool {
        !is_reserved(name) && self.data.contains_key(name)
    }

    /// Property names, excluding metadata keys.
    pub fn property_names(&self) -> Vec<&str> {
        self.data
            .keys()
            .map(String::as_str)
            .filter(|k| !is_reserved(k))
            .collect()
    }

    /// All properties, excluding metadata keys.
    pub fn properties(&self) -> Map<String, Value> {
        self.data
            .iter()
            .filter(|(k, _)| !is_reserved(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// String property helper for typed accessors.
    pub(crate) fn str_property(&self, name: &str) -> Option<&str> {
        self.property(name).ok().and_then(Value::as_str)
    }

    /// Whether a link with this relation exists.
    pub fn has_link(&self, rel: &str) -> bool {
        self.link_href(rel).is_some()
    }

    /// Get a link URL.
    ///
    /// With `absolute`, a relative href is resolved against the connector's
    /// base URL.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::LinkNotFound`] if there is no such relation.
    pub fn link(&self, rel: &str, absolute: bool) -> Result<String> {
        let href = self
            .link_href(rel)
            .ok_or_else(|| PlatformError::LinkNotFound(rel.to_string()))?;

        if !absolute {
            return Ok(href.to_string());
        }

        match url::Url::parse(href) {
            Ok(url) => Ok(url.to_string()),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Ok(self.connector.resolve(href)?.to_string())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The canonical URI (the `self` link).
    pub fn uri(&self, absolute: bool) -> Result<String> {
        self.link("self", absolute)
    }

    /// Embedded data for a relation, if present.
    pub fn embedded(&self, rel: &str) -> Option<&Value> {
        self.data.get(EMBEDDED_KEY).and_then(|e| e.get(rel))
    }

    fn link_href(&self, rel: &str) -> Option<&str> {
        let link = self.data.get(LINKS_KEY)?.get(rel)?;
        let link = match link {
            Value::Array(items) => items.first()?,
            other => other,
        };
        link.get("href").and_then(Value::as_str)
    }

    /// Re-fetch this resource and replace its data.
    ///
    /// Any local state is discarded; the instance becomes full.
    pub async fn refresh(&mut self, options: RequestOptions) -> Result<()> {
        let uri = self.uri(true)?;
        tracing::debug!(%uri, "refreshing resource");

        let response = self.connector.get(&uri, options).await?;
        let data = Connector::json(response).await?;
        self.replace(data);
        Ok(())
    }

    /// Refresh only if this is a stub.
    pub async fn ensure_full(&mut self) -> Result<()> {
        if !self.is_full {
            self.refresh(RequestOptions::default()).await?;
        }
        Ok(())
    }

    /// Whether the server advertises `op` (a `#op` link) on this instance.
    pub fn operation_available(&self, op: &str) -> bool {
        self.has_link(&operation_rel(op))
    }

    /// Run an operation and return the decoded response.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::OperationUnavailable`] if the resource has no
    /// `#op` link, or any transport/API error.
    pub async fn run_operation(
        &self,
        op: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<Value> {
        if !self.operation_available(op) {
            return Err(PlatformError::OperationUnavailable(op.to_string()));
        }
        let url = self.link(&operation_rel(op), true)?;
        tracing::debug!(operation = op, %method, %url, "running operation");

        let options = RequestOptions {
            json: body,
            ..Default::default()
        };
        let request = self.connector.create_request(method, &url, options)?;
        let response = self.connector.send(request).await?;
        Connector::json(response).await
    }

    /// Run an operation that starts a background activity.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::MissingActivity`] if the response does not
    /// embed at least one activity.
    pub async fn run_long_operation(
        &self,
        op: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<Activity> {
        let response = self.run_operation(op, method, body).await?;
        let activity = response
            .get(EMBEDDED_KEY)
            .and_then(|e| e.get("activities"))
            .and_then(|a| a.get(0))
            .filter(|a| a.is_object())
            .cloned()
            .ok_or_else(|| PlatformError::MissingActivity {
                operation: op.to_string(),
            })?;

        Ok(Activity::wrap(activity, &self.connector))
    }

    /// Update properties through the `#edit` operation.
    ///
    /// If the response embeds the updated `entity`, it replaces the local
    /// data. Otherwise local data is left as it was; call
    /// [`refresh`](Resource::refresh) to be certain of the server state.
    pub async fn update(&mut self, values: Value) -> Result<()> {
        let response = self.run_operation("edit", Method::PATCH, Some(values)).await?;

        match response.get(EMBEDDED_KEY).and_then(|e| e.get("entity")) {
            Some(entity) if entity.is_object() => {
                self.replace(entity.clone());
            }
            _ => {
                // TODO: decide whether to refresh here once callers stop relying on the no-op
                tracing::warn!(
                    uri = self.uri(false).unwrap_or_default(),
                    "update response did not include the entity; local data may be stale"
                );
            }
        }
        Ok(())
    }

    /// Delete this resource on the server.
    ///
    /// Local data is untouched; discard the instance afterwards.
    pub async fn delete(&self) -> Result<Value> {
        let uri = self.uri(true)?;
        tracing::debug!(%uri, "deleting resource");

        let response = self.connector.delete(&uri).await?;
        Connector::json(response).await
    }

    fn replace(&mut self, data: Value) {
        let (data, _) = split_full_flag(data);
        self.data = data;
        self.is_full = true;
    }
}

impl Index<&str> for Resource {
    type Output = Value;

    /// # Panics
    ///
    /// Panics if the property is absent or reserved.
    fn index(&self, name: &str) -> &Value {
        match self.property(name) {
            Ok(value) => value,
            Err(_) => panic!("property not found: {name}"),
        }
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}

fn operation_rel(op: &str) -> String {
    format!("#{op}")
}

fn split_full_flag(data: Value) -> (Map<String, Value>, bool) {
    let mut map = match data {
        Value::Object(map) => map,
        other => {
            tracing::warn!(kind = json_kind(&other), "wrapping non-object payload as empty resource");
            Map::new()
        }
    };
    let is_full = map
        .remove(FULL_KEY)
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    (map, is_full)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn connector() -> Connector {
        Connector::new("token", "https://eu.example.com/api/projects/p1").unwrap()
    }

    fn environment() -> Resource {
        Resource::new(
            json!({
                "id": "main",
                "title": "Main",
                "status": "active",
                "_links": {
                    "self": {"href": "/api/projects/p1/environments/main"},
                    "#edit": {"href": "https://eu.example.com/api/projects/p1/environments/main"},
                    "public-url": [{"href": "https://main.example.site/"}]
                },
                "_embedded": {"parent": null}
            }),
            connector(),
        )
    }

    #[test]
    fn test_reserved_keys_are_never_properties() {
        let resource = environment();
        for key in RESERVED_KEYS {
            assert!(matches!(
                resource.property(key),
                Err(PlatformError::PropertyNotFound(_))
            ));
            assert!(!resource.has_property(key));
        }
    }

    #[test]
    fn test_property_names_skip_metadata() {
        let resource = environment();
        let mut names = resource.property_names();
        names.sort_unstable();
        assert_eq!(names, vec!["id", "status", "title"]);
        assert_eq!(
            Value::Object(resource.properties()),
            json!({"id": "main", "title": "Main", "status": "active"})
        );
    }

    #[test]
    fn test_missing_property() {
        let resource = environment();
        let err = resource.property("nope").unwrap_err();
        assert_eq!(err.to_string(), "Property not found: nope");
    }

    #[test]
    fn test_index_reads_property() {
        let resource = environment();
        assert_eq!(resource["title"], "Main");
    }

    #[test]
    #[should_panic(expected = "property not found: _links")]
    fn test_index_panics_on_reserved_key() {
        let resource = environment();
        let _ = &resource["_links"];
    }

    #[test]
    fn test_full_flag_is_consumed() {
        let resource = Resource::new(json!({"id": "x", "_full": true}), connector());
        assert!(resource.is_full());
        assert!(!resource.data().contains_key("_full"));

        let stub = Resource::new(json!({"id": "x"}), connector());
        assert!(!stub.is_full());
    }

    #[test]
    fn test_non_object_wraps_as_empty() {
        let resource = Resource::new(json!([1, 2]), connector());
        assert!(resource.property_names().is_empty());
    }

    #[test]
    fn test_links() {
        let resource = environment();
        assert!(resource.has_link("self"));
        assert!(!resource.has_link("#delete"));
        assert_eq!(
            resource.uri(false).unwrap(),
            "/api/projects/p1/environments/main"
        );
        assert_eq!(
            resource.uri(true).unwrap(),
            "https://eu.example.com/api/projects/p1/environments/main"
        );
        assert_eq!(
            resource.link("public-url", true).unwrap(),
            "https://main.example.site/"
        );
        assert!(matches!(
            resource.link("#delete", false),
            Err(PlatformError::LinkNotFound(rel)) if rel == "#delete"
        ));
    }

    #[test]
    fn test_operation_available() {
        let resource = environment();
        assert!(resource.operation_available("edit"));
        assert!(!resource.operation_available("delete"));
        // Operations are only the `#` relations
        assert!(!resource.operation_available("self"));
    }

    #[tokio::test]
    async fn test_run_operation_unavailable_sends_nothing() {
        let resource = environment();
        let err = resource
            .run_operation("activate", Method::POST, None)
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::OperationUnavailable(op) if op == "activate"));
    }

    #[test]
    fn test_embedded() {
        let resource = environment();
        assert_eq!(resource.embedded("parent"), Some(&Value::Null));
        assert!(resource.embedded("activities").is_none());
    }

    #[test]
    fn test_serialize_emits_raw_data() {
        let resource = Resource::new(json!({"id": "x", "_full": true, "_links": {}}), connector());
        let value = serde_json::to_value(&resource).unwrap();
        assert_eq!(value, json!({"id": "x", "_links": {}}));
    }
}
