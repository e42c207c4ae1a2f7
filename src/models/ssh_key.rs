//! SSH key resource.

use std::ops::{Deref, DerefMut};

use serde::Serialize;
use serde_json::Value;

use crate::resource::Resource;
use crate::traits::{Create, Get, ResourceType};

/// A public SSH key registered on the account.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct SshKey(Resource);

impl ResourceType for SshKey {
    const NAME: &'static str = "SSH key";
    const REQUIRED: &'static [&'static str] = &["value"];

    fn from_resource(resource: Resource) -> Self {
        Self(resource)
    }

    fn resource(&self) -> &Resource {
        &self.0
    }
}

impl Get for SshKey {}
impl Create for SshKey {}

impl Deref for SshKey {
    type Target = Resource;

    fn deref(&self) -> &Resource {
        &self.0
    }
}

impl DerefMut for SshKey {
    fn deref_mut(&mut self) -> &mut Resource {
        &mut self.0
    }
}

impl SshKey {
    /// The key ID. The API reports it as a number.
    pub fn id(&self) -> Option<String> {
        match self.property("key_id").ok()? {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.str_property("title")
    }

    pub fn fingerprint(&self) -> Option<&str> {
        self.str_property("fingerprint")
    }

    /// The public key itself.
    pub fn value(&self) -> Option<&str> {
        self.str_property("value")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::Connector;
    use serde_json::json;

    #[test]
    fn test_id_from_number_or_string() {
        let connector = Connector::new("token", "https://accounts.example.com/api/").unwrap();
        let numeric = SshKey::wrap(json!({"key_id": 42, "title": "laptop"}), &connector);
        assert_eq!(numeric.id().as_deref(), Some("42"));
        assert_eq!(numeric.title(), Some("laptop"));

        let text = SshKey::wrap(json!({"key_id": "42"}), &connector);
        assert_eq!(text.id().as_deref(), Some("42"));

        assert!(SshKey::wrap(json!({}), &connector).id().is_none());
    }

    #[test]
    fn test_value_is_required() {
        assert_eq!(SshKey::required(), &["value"]);
        assert_eq!(SshKey::check(&json!({"title": "x"})), vec!["Missing: value"]);
    }
}
