use serde::{Deserialize, Serialize};

use crate::models::Heartbeat;

const LIFECYCLE_EVENTS: [&str; 4] = ["load", "focus", "blur", "unload"];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    /// Page lifecycle changes, always recorded.
    Lifecycle,
    /// User input, recorded at most once per interval per page.
    Interaction,
}

impl EventKind {
    pub fn classify(event_type: &str) -> Self {
        if LIFECYCLE_EVENTS.contains(&event_type) {
            EventKind::Lifecycle
        } else {
            EventKind::Interaction
        }
    }
}

/// Where the user is at the moment an event fires.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub origin: String,
    /// Path plus query string.
    pub path: String,
    pub title: String,
}

impl PageSnapshot {
    pub fn new(
        origin: impl Into<String>,
        path: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            path: path.into(),
            title: title.into(),
        }
    }
}

impl Heartbeat {
    pub fn capture(event_type: &str, time: i64, page: &PageSnapshot) -> Self {
        Heartbeat::new(
            event_type,
            time,
            page.origin.clone(),
            page.path.clone(),
            page.title.clone(),
        )
    }
}
