//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use serde_json::{json, Value};

/// Collection of fixture factories for test data.
pub struct Fixtures;

/// A complete set of fixtures for the default mock state.
pub struct DefaultScenario {
    pub account: Value,
    pub projects: Vec<Value>,
    /// (project ID, environment)
    pub environments: Vec<(String, Value)>,
    /// (project ID, activity)
    pub activities: Vec<(String, Value)>,
    /// (project ID, domain)
    pub domains: Vec<(String, Value)>,
    pub ssh_keys: Vec<Value>,
}

impl Fixtures {
    // =========================================================================
    // Account Fixtures
    // =========================================================================

    /// Account fields for a test user.
    pub fn account(username: &str) -> Value {
        json!({
            "id": format!("user-{username}"),
            "username": username,
            "display_name": "Test User",
            "mail": format!("{username}@example.com"),
        })
    }

    // =========================================================================
    // Project Fixtures
    // =========================================================================

    /// Create a project with the fields every project has.
    pub fn project(id: &str, title: &str) -> Value {
        json!({
            "id": id,
            "title": title,
            "region": "eu.example.site",
            "default_domain": null,
            "subscription": {"plan": "development"},
        })
    }

    // =========================================================================
    // Environment Fixtures
    // =========================================================================

    /// Create an environment.
    pub fn environment(id: &str, parent: Option<&str>, status: &str) -> Value {
        json!({
            "id": id,
            "name": id,
            "machine_name": format!("{id}-mock"),
            "title": id,
            "parent": parent,
            "status": status,
            "is_dirty": false,
        })
    }

    // =========================================================================
    // Activity Fixtures
    // =========================================================================

    /// Create a finished activity.
    pub fn completed_activity(id: &str, activity_type: &str) -> Value {
        json!({
            "id": id,
            "type": activity_type,
            "state": "complete",
            "result": "success",
            "completion_percent": 100,
            "description": format!("{activity_type} finished"),
            "created_at": "2024-01-01T00:00:00+00:00",
        })
    }

    // =========================================================================
    // Domain and SSH Key Fixtures
    // =========================================================================

    /// Create a domain without a custom certificate.
    pub fn domain(name: &str) -> Value {
        json!({
            "name": name,
            "ssl": {"has_certificate": false},
        })
    }

    /// Create an SSH key.
    pub fn ssh_key(key_id: u64, title: &str) -> Value {
        json!({
            "key_id": key_id,
            "title": title,
            "value": format!("ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAA{key_id} {title}"),
            "fingerprint": format!("SHA256:fixture{key_id}"),
        })
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    /// The default scenario: two projects, one with a branch hierarchy.
    pub fn default_scenario() -> DefaultScenario {
        let shop = "abc123".to_string();

        DefaultScenario {
            account: Self::account("tester"),
            projects: vec![
                Self::project(&shop, "Shop"),
                Self::project("xyz789", "Blog"),
            ],
            environments: vec![
                (shop.clone(), Self::environment("main", None, "active")),
                (shop.clone(), Self::environment("staging", Some("main"), "active")),
                (shop.clone(), Self::environment("old-feature", Some("main"), "inactive")),
            ],
            activities: vec![
                (shop.clone(), Self::completed_activity("act-push", "environment.push")),
                (shop.clone(), Self::completed_activity("act-backup", "environment.backup")),
            ],
            domains: vec![(shop, Self::domain("shop.example.com"))],
            ssh_keys: vec![Self::ssh_key(1, "laptop")],
        }
    }
}
