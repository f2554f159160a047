//! Task descriptor types (the queue's wire contract)

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier of a task in the queue
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Create a task ID from any string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Full description of one unit of work submitted to the queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDescriptor {
    /// Group the task belongs to (the decision task's own id)
    pub task_group_id: TaskId,
    /// Tasks that must resolve successfully before this one runs
    pub dependencies: Vec<TaskId>,
    pub scheduler_id: String,
    pub provisioner_id: String,
    pub worker_type: String,
    #[serde(with = "timestamp")]
    pub created: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub deadline: DateTime<Utc>,
    pub metadata: TaskMetadata,
    /// Scopes the task needs for its caches and features
    pub scopes: Vec<String>,
    pub payload: TaskPayload,
}

/// Human-facing metadata block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMetadata {
    pub name: String,
    pub description: String,
    pub owner: String,
    pub source: String,
}

/// Worker payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    /// Named persistent caches and their mount points
    pub cache: BTreeMap<String, String>,
    /// Maximum run time in seconds
    pub max_run_time: u64,
    pub image: TaskImage,
    pub command: Vec<String>,
    pub env: BTreeMap<String, String>,
    /// Published artifacts keyed by their public name
    pub artifacts: BTreeMap<String, ArtifactSpec>,
    pub features: BTreeMap<String, bool>,
}

/// Container image a task runs in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskImage {
    /// Image pulled from a registry by name
    Named(String),
    /// Image loaded from another task's artifact
    Reference(ImageReference),
}

impl TaskImage {
    /// Image published as an artifact of an earlier task
    pub fn from_task(task_id: TaskId, path: impl Into<String>) -> Self {
        Self::Reference(ImageReference::TaskImage {
            task_id,
            path: path.into(),
        })
    }
}

impl From<&str> for TaskImage {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for TaskImage {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

/// Structured image reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ImageReference {
    TaskImage {
        #[serde(rename = "taskId")]
        task_id: TaskId,
        path: String,
    },
}

/// Kind of a published artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    File,
}

/// One published artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSpec {
    #[serde(rename = "type")]
    pub kind: ArtifactKind,
    /// Path inside the container
    pub path: String,
    #[serde(with = "timestamp")]
    pub expires: DateTime<Utc>,
}

impl ArtifactSpec {
    /// A single file artifact
    pub fn file(path: impl Into<String>, expires: DateTime<Utc>) -> Self {
        Self {
            kind: ArtifactKind::File,
            path: path.into(),
            expires,
        }
    }
}

/// Queue timestamps: RFC 3339, millisecond precision, `Z` suffix
pub mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
