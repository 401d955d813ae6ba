//! Heartbeat records and typed field selection.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observed activity moment on a page.
///
/// A heartbeat is a point-in-time fact and is never edited after it has been
/// captured. `time` is milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Heartbeat {
    /// Name of the event that triggered the heartbeat (`load`, `scroll`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    pub time: i64,
    /// Scheme and host of the page.
    #[serde(default)]
    pub origin: String,
    /// Path and query of the page.
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub title: String,
}

impl Heartbeat {
    pub fn new(
        kind: impl Into<String>,
        time: i64,
        origin: impl Into<String>,
        path: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            time,
            origin: origin.into(),
            path: path.into(),
            title: title.into(),
        }
    }

    /// The heartbeat time as a UTC timestamp, if it is representable.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.time)
    }
}

/// A heartbeat field that aggregates can be keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeartbeatField {
    #[serde(rename = "type")]
    Kind,
    #[default]
    Origin,
    Path,
    Title,
}

impl HeartbeatField {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeartbeatField::Kind => "type",
            HeartbeatField::Origin => "origin",
            HeartbeatField::Path => "path",
            HeartbeatField::Title => "title",
        }
    }

    /// Read this field from a heartbeat.
    ///
    /// Fields absent from the stored record deserialize to an empty string,
    /// which then acts as the group key for every heartbeat missing it.
    pub fn value<'a>(&self, heartbeat: &'a Heartbeat) -> &'a str {
        match self {
            HeartbeatField::Kind => &heartbeat.kind,
            HeartbeatField::Origin => &heartbeat.origin,
            HeartbeatField::Path => &heartbeat.path,
            HeartbeatField::Title => &heartbeat.title,
        }
    }
}

impl fmt::Display for HeartbeatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeartbeatField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "type" | "kind" => Ok(HeartbeatField::Kind),
            "origin" => Ok(HeartbeatField::Origin),
            "path" => Ok(HeartbeatField::Path),
            "title" => Ok(HeartbeatField::Title),
            _ => Err(format!("unknown heartbeat field '{value}'")),
        }
    }
}
