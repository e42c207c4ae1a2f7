//! Domain resource.

use std::ops::{Deref, DerefMut};

use serde::Serialize;
use serde_json::Value;

use crate::resource::Resource;
use crate::traits::{Create, Get, List, ResourceType};

/// A domain routed to a project.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Domain(Resource);

impl ResourceType for Domain {
    const NAME: &'static str = "Domain";
    const REQUIRED: &'static [&'static str] = &["name"];

    fn from_resource(resource: Resource) -> Self {
        Self(resource)
    }

    fn resource(&self) -> &Resource {
        &self.0
    }
}

impl Get for Domain {}
impl List for Domain {}
impl Create for Domain {}

impl Deref for Domain {
    type Target = Resource;

    fn deref(&self) -> &Resource {
        &self.0
    }
}

impl DerefMut for Domain {
    fn deref_mut(&mut self) -> &mut Resource {
        &mut self.0
    }
}

impl Domain {
    pub fn name(&self) -> Option<&str> {
        self.str_property("name")
    }

    /// Whether a custom TLS certificate is attached.
    pub fn has_certificate(&self) -> bool {
        self.property("ssl")
            .ok()
            .and_then(|ssl| ssl.get("has_certificate"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}
