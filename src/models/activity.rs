//! Activity resource: a background task started by a long operation.

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::connector::RequestOptions;
use crate::error::Result;
use crate::resource::Resource;
use crate::traits::{Get, List, ResourceType};

/// Activity state: queued.
pub const STATE_PENDING: &str = "pending";
/// Activity state: running.
pub const STATE_IN_PROGRESS: &str = "in_progress";
/// Activity state: finished (successfully or not).
pub const STATE_COMPLETE: &str = "complete";

/// A server-side background task.
///
/// Activities are returned by long operations such as
/// [`Environment::branch`](crate::Environment::branch). Their state only
/// changes locally when refreshed, either explicitly or through
/// [`Activity::wait`].
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Activity(Resource);

impl ResourceType for Activity {
    const NAME: &'static str = "Activity";

    fn from_resource(resource: Resource) -> Self {
        Self(resource)
    }

    fn resource(&self) -> &Resource {
        &self.0
    }
}

impl Get for Activity {}
impl List for Activity {}

impl Deref for Activity {
    type Target = Resource;

    fn deref(&self) -> &Resource {
        &self.0
    }
}

impl DerefMut for Activity {
    fn deref_mut(&mut self) -> &mut Resource {
        &mut self.0
    }
}

impl Activity {
    pub fn id(&self) -> Option<&str> {
        self.str_property("id")
    }

    /// One of [`STATE_PENDING`], [`STATE_IN_PROGRESS`], [`STATE_COMPLETE`].
    pub fn state(&self) -> Option<&str> {
        self.str_property("state")
    }

    pub fn is_complete(&self) -> bool {
        self.state() == Some(STATE_COMPLETE)
    }

    /// Whether the activity completed with a `success` result.
    pub fn is_success(&self) -> bool {
        self.is_complete() && self.str_property("result") == Some("success")
    }

    /// Completion percentage, clamped to 100.
    pub fn completion_percent(&self) -> u8 {
        self.property("completion_percent")
            .ok()
            .and_then(Value::as_u64)
            .map_or(0, |p| p.min(100) as u8)
    }

    /// The activity type, e.g. `environment.branch`.
    pub fn activity_type(&self) -> Option<&str> {
        self.str_property("type")
    }

    pub fn description(&self) -> Option<&str> {
        self.str_property("description")
    }

    pub fn log(&self) -> Option<&str> {
        self.str_property("log")
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.str_property("created_at")
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Poll until the activity is complete.
    ///
    /// Sleeps `poll_interval` between refreshes and calls `on_poll` after
    /// each one. Returns immediately if already complete.
    ///
    /// # Errors
    ///
    /// Returns the first refresh error; polling stops there.
    pub async fn wait<F>(&mut self, poll_interval: Duration, mut on_poll: F) -> Result<()>
    where
        F: FnMut(&Activity) + Send,
    {
        while !self.is_complete() {
            tokio::time::sleep(poll_interval).await;
            self.0.refresh(RequestOptions::default()).await?;
            tracing::debug!(
                id = self.id().unwrap_or_default(),
                state = self.state().unwrap_or_default(),
                percent = self.completion_percent(),
                "polled activity"
            );
            on_poll(self);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::Connector;
    use serde_json::json;

    fn activity(data: Value) -> Activity {
        let connector = Connector::new("token", "https://eu.example.com/api/projects/abc").unwrap();
        Activity::wrap(data, &connector)
    }

    #[test]
    fn test_state_helpers() {
        let running = activity(json!({"state": "in_progress", "completion_percent": 40}));
        assert!(!running.is_complete());
        assert_eq!(running.completion_percent(), 40);

        let done = activity(json!({"state": "complete", "result": "success"}));
        assert!(done.is_complete());
        assert!(done.is_success());

        let failed = activity(json!({"state": "complete", "result": "failure"}));
        assert!(!failed.is_success());
    }

    #[test]
    fn test_completion_percent_defaults_and_clamps() {
        assert_eq!(activity(json!({})).completion_percent(), 0);
        assert_eq!(activity(json!({"completion_percent": 250})).completion_percent(), 100);
    }

    #[test]
    fn test_created_at_parses_rfc3339() {
        let a = activity(json!({"created_at": "2024-03-01T12:30:00+01:00"}));
        assert_eq!(
            a.created_at().unwrap().to_rfc3339(),
            "2024-03-01T11:30:00+00:00"
        );
        assert!(activity(json!({"created_at": "yesterday"})).created_at().is_none());
    }

    #[tokio::test]
    async fn test_wait_on_complete_activity_does_not_poll() {
        let mut a = activity(json!({"id": "a1", "state": "complete"}));
        let mut polls = 0;
        a.wait(Duration::from_millis(1), |_| polls += 1).await.unwrap();
        assert_eq!(polls, 0);
    }
}
