//! Base trait shared by all resource variants.

use serde_json::Value;

use crate::connector::Connector;
use crate::resource::Resource;

/// A typed view over a [`Resource`].
///
/// Variants are thin wrappers that delegate to the inner resource and may
/// add typed accessors. Each declares the properties required to create it.
pub trait ResourceType: Sized + Send + Sync {
    /// Entity name used in error messages and logs.
    const NAME: &'static str;

    /// Properties that must be present in a create request body.
    const REQUIRED: &'static [&'static str] = &[];

    /// Build the variant from a generic resource.
    fn from_resource(resource: Resource) -> Self;

    /// Borrow the underlying resource.
    fn resource(&self) -> &Resource;

    /// Wrap a raw JSON object. Performs no validation and no request.
    fn wrap(data: Value, connector: &Connector) -> Self {
        Self::from_resource(Resource::new(data, connector.clone()))
    }

    /// Wrap each element of a JSON array, preserving order.
    ///
    /// Elements are stubs unless they carry the `_full` flag.
    fn wrap_collection(data: Vec<Value>, connector: &Connector) -> Vec<Self> {
        data.into_iter()
            .map(|item| Self::wrap(item, connector))
            .collect()
    }

    /// The properties required for creation.
    fn required() -> &'static [&'static str] {
        Self::REQUIRED
    }

    /// Validate a create request body.
    ///
    /// Returns a single `Missing: a, b` message naming every absent required
    /// property, or no messages if the body is valid.
    fn check(data: &Value) -> Vec<String> {
        let missing: Vec<&str> = Self::required()
            .iter()
            .copied()
            .filter(|name| data.get(name).is_none())
            .collect();

        if missing.is_empty() {
            Vec::new()
        } else {
            vec![format!("Missing: {}", missing.join(", "))]
        }
    }
}

impl ResourceType for Resource {
    const NAME: &'static str = "Resource";

    fn from_resource(resource: Resource) -> Self {
        resource
    }

    fn resource(&self) -> &Resource {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Titled(Resource);

    impl ResourceType for Titled {
        const NAME: &'static str = "Titled";
        const REQUIRED: &'static [&'static str] = &["name", "title"];

        fn from_resource(resource: Resource) -> Self {
            Self(resource)
        }

        fn resource(&self) -> &Resource {
            &self.0
        }
    }

    fn connector() -> Connector {
        Connector::new("token", "https://example.com/api/").unwrap()
    }

    #[test]
    fn test_check_reports_missing_title() {
        assert_eq!(Titled::check(&json!({"name": "x"})), vec!["Missing: title"]);
    }

    #[test]
    fn test_check_passes_when_complete() {
        assert!(Titled::check(&json!({"name": "x", "title": "y"})).is_empty());
    }

    #[test]
    fn test_check_names_all_missing_in_order() {
        assert_eq!(Titled::check(&json!({})), vec!["Missing: name, title"]);
        // Non-object bodies have no keys at all
        assert_eq!(Titled::check(&json!("x")), vec!["Missing: name, title"]);
    }

    #[test]
    fn test_generic_resource_requires_nothing() {
        assert!(Resource::required().is_empty());
        assert!(Resource::check(&json!({})).is_empty());
    }

    #[test]
    fn test_wrap_collection_preserves_order() {
        let items = vec![json!({"id": "a"}), json!({"id": "b"}), json!({"id": "c"})];
        let wrapped = Titled::wrap_collection(items, &connector());
        let ids: Vec<&str> = wrapped
            .iter()
            .map(|t| t.resource()["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(wrapped.iter().all(|t| !t.resource().is_full()));
    }
}
