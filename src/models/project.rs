//! Project resource and its sub-collections.

use std::ops::{Deref, DerefMut};

use serde::Serialize;
use serde_json::json;

use crate::connector::RequestOptions;
use crate::error::Result;
use crate::models::{Activity, Domain, Environment};
use crate::resource::Resource;
use crate::traits::{Create, Get, List, ResourceType};

/// A project.
///
/// Each project lives on its own regional endpoint; its connector is bound
/// to that endpoint, and all sub-collections are fetched through it.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Project(Resource);

impl ResourceType for Project {
    const NAME: &'static str = "Project";

    fn from_resource(resource: Resource) -> Self {
        Self(resource)
    }

    fn resource(&self) -> &Resource {
        &self.0
    }
}

impl Get for Project {}
impl List for Project {}

impl Deref for Project {
    type Target = Resource;

    fn deref(&self) -> &Resource {
        &self.0
    }
}

impl DerefMut for Project {
    fn deref_mut(&mut self) -> &mut Resource {
        &mut self.0
    }
}

impl Project {
    /// The project ID.
    pub fn id(&self) -> Option<&str> {
        self.str_property("id")
    }

    /// The project title.
    pub fn title(&self) -> Option<&str> {
        self.str_property("title")
    }

    /// The API endpoint serving this project.
    pub fn endpoint(&self) -> Option<&str> {
        self.str_property("endpoint")
    }

    /// The region hosting this project.
    pub fn region(&self) -> Option<&str> {
        self.str_property("region")
    }

    fn collection_url(&self, name: &str) -> Result<String> {
        Ok(format!("{}/{}", self.uri(true)?.trim_end_matches('/'), name))
    }

    /// List the project's environments.
    pub async fn environments(&self, limit: Option<usize>) -> Result<Vec<Environment>> {
        let url = self.collection_url("environments")?;
        Environment::get_collection(self.connector(), &url, limit, RequestOptions::default()).await
    }

    /// Get a single environment.
    ///
    /// Returns `None` if it does not exist.
    pub async fn environment(&self, id: &str) -> Result<Option<Environment>> {
        let url = self.collection_url("environments")?;
        Environment::get(self.connector(), &url, id).await
    }

    /// List recent activities, optionally restricted to one activity type.
    pub async fn activities(
        &self,
        limit: Option<usize>,
        activity_type: Option<&str>,
    ) -> Result<Vec<Activity>> {
        let url = self.collection_url("activities")?;
        let mut options = RequestOptions::default();
        if let Some(activity_type) = activity_type {
            options = options.with_query("type", activity_type);
        }
        Activity::get_collection(self.connector(), &url, limit, options).await
    }

    /// Get a single activity.
    pub async fn activity(&self, id: &str) -> Result<Option<Activity>> {
        let url = self.collection_url("activities")?;
        Activity::get(self.connector(), &url, id).await
    }

    /// List the project's domains.
    pub async fn domains(&self, limit: Option<usize>) -> Result<Vec<Domain>> {
        let url = self.collection_url("domains")?;
        Domain::get_collection(self.connector(), &url, limit, RequestOptions::default()).await
    }

    /// Get a single domain by name.
    pub async fn domain(&self, name: &str) -> Result<Option<Domain>> {
        let url = self.collection_url("domains")?;
        Domain::get(self.connector(), &url, name).await
    }

    /// Add a domain to the project.
    pub async fn add_domain(&self, name: &str) -> Result<Domain> {
        let url = self.collection_url("domains")?;
        Domain::create(self.connector(), &url, json!({ "name": name })).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::Connector;
    use serde_json::json;

    fn project() -> Project {
        let connector = Connector::new("token", "https://eu.example.com/api/projects/abc").unwrap();
        Project::wrap(
            json!({
                "id": "abc",
                "title": "Shop",
                "region": "eu.example.com",
                "endpoint": "https://eu.example.com/api/projects/abc",
                "_links": {"self": {"href": "https://eu.example.com/api/projects/abc/"}}
            }),
            &connector,
        )
    }

    #[test]
    fn test_accessors() {
        let project = project();
        assert_eq!(project.id(), Some("abc"));
        assert_eq!(project.title(), Some("Shop"));
        assert_eq!(project.region(), Some("eu.example.com"));
        assert_eq!(
            project.endpoint(),
            Some("https://eu.example.com/api/projects/abc")
        );
    }

    #[test]
    fn test_collection_url_from_self_link() {
        assert_eq!(
            project().collection_url("environments").unwrap(),
            "https://eu.example.com/api/projects/abc/environments"
        );
    }

    #[test]
    fn test_serializes_as_raw_data() {
        let value = serde_json::to_value(project()).unwrap();
        assert_eq!(value["title"], "Shop");
        assert!(value.get("_links").is_some());
    }
}
