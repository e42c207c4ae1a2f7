//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Platform API server.
//! Entities are stored as plain JSON; the `hal_*` methods decorate them with
//! `_links` the way the real API does.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tokio::sync::RwLock;

/// Shared state for the mock server.
///
/// Wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// URL the server listens on; set when the server starts.
    pub base_url: String,

    /// Account fields returned by `/me` (besides projects and keys).
    pub account: Map<String, Value>,

    /// Projects indexed by ID.
    pub projects: BTreeMap<String, Value>,

    /// Environments per project, indexed by environment ID.
    pub environments: BTreeMap<String, BTreeMap<String, Value>>,

    /// Activities per project, oldest first.
    pub activities: BTreeMap<String, Vec<Value>>,

    /// Domains per project, indexed by name.
    pub domains: BTreeMap<String, BTreeMap<String, Value>>,

    /// SSH keys indexed by key ID.
    pub ssh_keys: BTreeMap<u64, Value>,

    /// Optional authentication token. If set, requests must include this token.
    pub required_token: Option<String>,

    next_activity_id: u64,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Set an account field.
    pub fn with_account_field(mut self, key: &str, value: Value) -> Self {
        self.account.insert(key.to_string(), value);
        self
    }

    /// Add a project. `data` must contain an `id`.
    pub fn with_project(mut self, data: Value) -> Self {
        if let Some(id) = data.get("id").and_then(Value::as_str) {
            self.projects.insert(id.to_string(), data.clone());
        }
        self
    }

    /// Add an environment to a project. `data` must contain an `id`.
    pub fn with_environment(mut self, project: &str, data: Value) -> Self {
        if let Some(id) = data.get("id").and_then(Value::as_str) {
            self.environments
                .entry(project.to_string())
                .or_default()
                .insert(id.to_string(), data.clone());
        }
        self
    }

    /// Add an activity to a project.
    pub fn with_activity(mut self, project: &str, data: Value) -> Self {
        self.activities
            .entry(project.to_string())
            .or_default()
            .push(data);
        self
    }

    /// Add a domain to a project. `data` must contain a `name`.
    pub fn with_domain(mut self, project: &str, data: Value) -> Self {
        if let Some(name) = data.get("name").and_then(Value::as_str) {
            self.domains
                .entry(project.to_string())
                .or_default()
                .insert(name.to_string(), data.clone());
        }
        self
    }

    /// Add an SSH key. `data` must contain a numeric `key_id`.
    pub fn with_ssh_key(mut self, data: Value) -> Self {
        if let Some(id) = data.get("key_id").and_then(Value::as_u64) {
            self.ssh_keys.insert(id, data);
        }
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    // =========================================================================
    // URLs and HAL decoration
    // =========================================================================

    /// Absolute endpoint of a project.
    pub fn project_endpoint(&self, id: &str) -> String {
        format!("{}/api/projects/{}", self.base_url, id)
    }

    fn project_path(id: &str) -> String {
        format!("/api/projects/{}", id)
    }

    fn with_links(mut data: Value, links: Map<String, Value>) -> Value {
        if let Some(map) = data.as_object_mut() {
            map.insert("_links".to_string(), Value::Object(links));
        }
        data
    }

    fn link(href: impl Into<String>) -> Value {
        json!({ "href": href.into() })
    }

    /// The account-info entry for a project: a stub with an endpoint.
    pub fn project_summary(&self, id: &str) -> Option<Value> {
        let project = self.projects.get(id)?;
        Some(json!({
            "id": id,
            "title": project.get("title").cloned().unwrap_or(Value::Null),
            "region": project.get("region").cloned().unwrap_or(Value::Null),
            "endpoint": self.project_endpoint(id),
        }))
    }

    /// A project with its links. `self` is host-relative, as the API sends it.
    pub fn hal_project(&self, id: &str) -> Option<Value> {
        let mut data = self.projects.get(id)?.clone();
        if let Some(map) = data.as_object_mut() {
            map.insert("endpoint".to_string(), json!(self.project_endpoint(id)));
        }

        let mut links = Map::new();
        links.insert("self".to_string(), Self::link(Self::project_path(id)));
        links.insert("#edit".to_string(), Self::link(self.project_endpoint(id)));
        Some(Self::with_links(data, links))
    }

    /// An environment with its links. Operations depend on its status.
    pub fn hal_environment(&self, project: &str, id: &str) -> Option<Value> {
        let data = self.environments.get(project)?.get(id)?.clone();
        let path = format!("{}/environments/{}", Self::project_path(project), id);
        let active = data.get("status").and_then(Value::as_str) == Some("active");
        let has_parent = data.get("parent").map_or(false, |p| !p.is_null());

        let mut links = Map::new();
        links.insert("self".to_string(), Self::link(path.clone()));
        links.insert("#edit".to_string(), Self::link(path.clone()));
        links.insert(
            "public-url".to_string(),
            Self::link(format!("https://{}-{}.example.site/", id, project)),
        );
        links.insert(
            "ssh".to_string(),
            Self::link(format!("ssh://{}-{}@ssh.example.site", project, id)),
        );

        if active {
            for op in ["branch", "deactivate", "backup"] {
                links.insert(format!("#{op}"), Self::link(format!("{path}/{op}")));
            }
            if has_parent {
                for op in ["merge", "synchronize"] {
                    links.insert(format!("#{op}"), Self::link(format!("{path}/{op}")));
                }
            }
        } else {
            links.insert("#activate".to_string(), Self::link(format!("{path}/activate")));
        }

        Some(Self::with_links(data, links))
    }

    /// An activity with its `self` link.
    pub fn hal_activity(&self, project: &str, activity: &Value) -> Value {
        let id = activity.get("id").and_then(Value::as_str).unwrap_or_default();
        let mut links = Map::new();
        links.insert(
            "self".to_string(),
            Self::link(format!("{}/activities/{}", Self::project_path(project), id)),
        );
        Self::with_links(activity.clone(), links)
    }

    /// A domain with its links.
    pub fn hal_domain(&self, project: &str, name: &str) -> Option<Value> {
        let data = self.domains.get(project)?.get(name)?.clone();
        let path = format!("{}/domains/{}", Self::project_path(project), name);
        let mut links = Map::new();
        links.insert("self".to_string(), Self::link(path.clone()));
        links.insert("#delete".to_string(), Self::link(path));
        Some(Self::with_links(data, links))
    }

    /// An SSH key with its links.
    pub fn hal_ssh_key(&self, id: u64) -> Option<Value> {
        let data = self.ssh_keys.get(&id)?.clone();
        let href = format!("{}/ssh_keys/{}", self.base_url, id);
        let mut links = Map::new();
        links.insert("self".to_string(), Self::link(href.clone()));
        links.insert("#delete".to_string(), Self::link(href));
        Some(Self::with_links(data, links))
    }

    /// The `/me` document.
    pub fn account_info(&self) -> Value {
        let mut info = self.account.clone();
        let projects: Vec<Value> = self
            .projects
            .keys()
            .filter_map(|id| self.project_summary(id))
            .collect();
        let keys: Vec<Value> = self
            .ssh_keys
            .keys()
            .filter_map(|id| self.hal_ssh_key(*id))
            .collect();
        info.insert("projects".to_string(), Value::Array(projects));
        info.insert("ssh_keys".to_string(), Value::Array(keys));
        Value::Object(info)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Merge `values` into a project. Returns the decorated project.
    pub fn update_project(&mut self, id: &str, values: &Map<String, Value>) -> Option<Value> {
        let project = self.projects.get_mut(id)?.as_object_mut()?;
        for (k, v) in values {
            project.insert(k.clone(), v.clone());
        }
        self.hal_project(id)
    }

    /// Merge `values` into an environment.
    pub fn update_environment(
        &mut self,
        project: &str,
        id: &str,
        values: &Map<String, Value>,
    ) -> bool {
        let Some(env) = self
            .environments
            .get_mut(project)
            .and_then(|envs| envs.get_mut(id))
            .and_then(Value::as_object_mut)
        else {
            return false;
        };
        for (k, v) in values {
            env.insert(k.clone(), v.clone());
        }
        true
    }

    /// Record a new in-progress activity and return it decorated.
    pub fn start_activity(&mut self, project: &str, activity_type: &str, description: String) -> Value {
        self.next_activity_id += 1;
        let activity = json!({
            "id": format!("act{}", self.next_activity_id),
            "type": activity_type,
            "state": "in_progress",
            "completion_percent": 0,
            "description": description,
            "created_at": "2024-01-01T00:00:00+00:00",
        });
        self.activities
            .entry(project.to_string())
            .or_default()
            .push(activity.clone());
        self.hal_activity(project, &activity)
    }

    /// Get an activity, advancing it to completion as if it had finished
    /// since the last poll.
    pub fn poll_activity(&mut self, project: &str, id: &str) -> Option<Value> {
        let activity = self
            .activities
            .get_mut(project)?
            .iter_mut()
            .find(|a| a.get("id").and_then(Value::as_str) == Some(id))?;

        if let Some(map) = activity.as_object_mut() {
            if map.get("state").and_then(Value::as_str) != Some("complete") {
                map.insert("state".to_string(), json!("complete"));
                map.insert("completion_percent".to_string(), json!(100));
                map.insert("result".to_string(), json!("success"));
            }
        }
        let activity = activity.clone();
        Some(self.hal_activity(project, &activity))
    }

    /// Activities of a project, newest first, optionally filtered by type.
    pub fn list_activities(&self, project: &str, activity_type: Option<&str>) -> Vec<Value> {
        self.activities
            .get(project)
            .map(|list| {
                list.iter()
                    .rev()
                    .filter(|a| {
                        activity_type
                            .map(|t| a.get("type").and_then(Value::as_str) == Some(t))
                            .unwrap_or(true)
                    })
                    .map(|a| self.hal_activity(project, a))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Store a new SSH key and return its ID.
    pub fn add_ssh_key(&mut self, mut data: Map<String, Value>) -> u64 {
        let id = self.ssh_keys.keys().next_back().map_or(1, |id| id + 1);
        data.insert("key_id".to_string(), json!(id));
        data.entry("title").or_insert(Value::Null);
        data.insert(
            "fingerprint".to_string(),
            json!(format!("SHA256:mock{id}")),
        );
        self.ssh_keys.insert(id, Value::Object(data));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> MockState {
        let mut state = MockState::new()
            .with_project(json!({"id": "abc", "title": "Shop", "region": "eu"}))
            .with_environment("abc", json!({"id": "main", "status": "active", "parent": null}))
            .with_environment(
                "abc",
                json!({"id": "dev", "status": "active", "parent": "main"}),
            )
            .with_environment(
                "abc",
                json!({"id": "old", "status": "inactive", "parent": "main"}),
            );
        state.base_url = "http://127.0.0.1:9".to_string();
        state
    }

    fn link_names(value: &Value) -> Vec<String> {
        value["_links"].as_object().unwrap().keys().cloned().collect()
    }

    #[test]
    fn test_project_summary_has_endpoint() {
        let summary = state().project_summary("abc").unwrap();
        assert_eq!(summary["endpoint"], "http://127.0.0.1:9/api/projects/abc");
        assert!(summary.get("_links").is_none());
    }

    #[test]
    fn test_environment_operations_follow_status() {
        let state = state();

        let main = link_names(&state.hal_environment("abc", "main").unwrap());
        assert!(main.contains(&"#branch".to_string()));
        assert!(!main.contains(&"#merge".to_string()));

        let dev = link_names(&state.hal_environment("abc", "dev").unwrap());
        assert!(dev.contains(&"#merge".to_string()));

        let old = link_names(&state.hal_environment("abc", "old").unwrap());
        assert!(old.contains(&"#activate".to_string()));
        assert!(!old.contains(&"#backup".to_string()));
    }

    #[test]
    fn test_poll_activity_completes_it() {
        let mut state = state();
        let started = state.start_activity("abc", "environment.backup", "Backup".to_string());
        assert_eq!(started["state"], "in_progress");

        let id = started["id"].as_str().unwrap().to_string();
        let polled = state.poll_activity("abc", &id).unwrap();
        assert_eq!(polled["state"], "complete");
        assert_eq!(polled["completion_percent"], 100);
    }

    #[test]
    fn test_add_ssh_key_assigns_increasing_ids() {
        let mut state = state().with_ssh_key(json!({"key_id": 7, "value": "ssh-rsa A"}));
        let mut data = Map::new();
        data.insert("value".to_string(), json!("ssh-ed25519 B"));
        assert_eq!(state.add_ssh_key(data), 8);
        assert_eq!(state.account_info()["ssh_keys"].as_array().unwrap().len(), 2);
    }
}
