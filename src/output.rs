//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{Activity, Domain, Environment, Project, Resource, SshKey};

/// Trait for human-readable key-value output.
///
/// Implemented by resource types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

fn header(kind: &str, id: &str) -> Vec<String> {
    let header = format!("{kind}: {id}");
    let divider = "─".repeat(header.chars().count().max(30));
    vec![header, divider]
}

/// Operations the server advertises for the resource, e.g. `edit, delete`.
fn operations(resource: &Resource) -> Option<String> {
    let ops: Vec<&str> = resource
        .data()
        .get("_links")
        .and_then(|links| links.as_object())
        .map(|links| {
            links
                .keys()
                .filter_map(|rel| rel.strip_prefix('#'))
                .collect()
        })
        .unwrap_or_default();

    if ops.is_empty() {
        None
    } else {
        Some(ops.join(", "))
    }
}

impl PrettyPrint for Resource {
    fn pretty_print(&self) -> String {
        let uri = self.uri(false).unwrap_or_default();
        let mut lines = header("Resource", &uri);

        for (name, value) in self.properties() {
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            lines.push(format!("{:<16}{}", format!("{name}:"), value));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Project {
    fn pretty_print(&self) -> String {
        let mut lines = header("Project", self.id().unwrap_or_default());
        lines.push(format!("Title:          {}", self.title().unwrap_or_default()));

        if let Some(region) = self.region() {
            lines.push(format!("Region:         {}", region));
        }

        if let Some(endpoint) = self.endpoint() {
            lines.push(format!("Endpoint:       {}", endpoint));
        }

        if let Some(ops) = operations(self) {
            lines.push(format!("Operations:     {}", ops));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Environment {
    fn pretty_print(&self) -> String {
        let mut lines = header("Environment", self.id().unwrap_or_default());
        lines.push(format!("Title:          {}", self.title().unwrap_or_default()));
        lines.push(format!("Status:         {}", self.status().unwrap_or("unknown")));

        if let Some(parent) = self.parent() {
            lines.push(format!("Parent:         {}", parent));
        }

        if let Ok(url) = self.public_url() {
            lines.push(format!("URL:            {}", url));
        }

        if let Ok(ssh) = self.ssh_url() {
            lines.push(format!("SSH:            {}", ssh));
        }

        if let Some(ops) = operations(self) {
            lines.push(format!("Operations:     {}", ops));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Activity {
    fn pretty_print(&self) -> String {
        let mut lines = header("Activity", self.id().unwrap_or_default());
        lines.push(format!("Type:           {}", self.activity_type().unwrap_or_default()));
        lines.push(format!(
            "State:          {} ({}%)",
            self.state().unwrap_or("unknown"),
            self.completion_percent()
        ));

        if let Some(description) = self.description() {
            lines.push(format!("Description:    {}", description));
        }

        if let Some(created) = self.created_at() {
            lines.push(format!("Created:        {}", created.format("%Y-%m-%d %H:%M:%S UTC")));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for SshKey {
    fn pretty_print(&self) -> String {
        let id = self.id().unwrap_or_default();
        let mut lines = header("SSH key", &id);
        lines.push(format!("Title:          {}", self.title().unwrap_or_default()));

        if let Some(fingerprint) = self.fingerprint() {
            lines.push(format!("Fingerprint:    {}", fingerprint));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Domain {
    fn pretty_print(&self) -> String {
        let mut lines = header("Domain", self.name().unwrap_or_default());
        lines.push(format!(
            "Certificate:    {}",
            if self.has_certificate() { "custom" } else { "none" }
        ));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Connector, ResourceType};

    #[test]
    fn test_project_pretty_print_format() {
        let connector = Connector::new("token", "https://eu.example.com/api/").unwrap();
        let project = Project::wrap(
            serde_json::json!({
                "id": "abc",
                "title": "My Project",
                "_links": {"self": {"href": "/api/projects/abc"}, "#edit": {"href": "/api/projects/abc"}}
            }),
            &connector,
        );

        let output = project.pretty_print();
        assert!(output.starts_with("Project:"));
        assert!(output.contains("Title:"));
        assert!(output.contains("Operations:     edit"));
    }

    #[test]
    fn test_resource_pretty_print_skips_metadata() {
        let connector = Connector::new("token", "https://eu.example.com/api/").unwrap();
        let resource = Resource::wrap(
            serde_json::json!({"name": "x", "size": 3, "_embedded": {"a": 1}}),
            &connector,
        );

        let output = resource.pretty_print();
        assert!(output.contains("name:"));
        assert!(output.contains("size:           3"));
        assert!(!output.contains("_embedded"));
    }
}
