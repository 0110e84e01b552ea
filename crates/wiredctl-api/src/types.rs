// Wire types for the Catalyst Center intent API.
//
// Every intent endpoint wraps its payload as `{"response": ..., "version": ...}`.
// Layer-2 feature containers stay as raw `serde_json::Value` -- their shape is
// owned by the mapping schemas in `wiredctl-core`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Standard `{response, version}` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub response: Option<T>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Body of `POST /dna/system/api/v1/auth/token`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(rename = "Token")]
    pub token: String,
}

/// Controller-assigned handle for an asynchronous operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Response to every write (create/update/delete intent, deploy).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskIdResponse {
    pub task_id: Option<TaskId>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Lifecycle state reported by `GET /tasks/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    Pending,
    Success,
    Failure,
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    /// Whether polling can stop.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }
}

/// A task record from `GET /tasks/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: TaskId,
    pub status: TaskStatus,
    #[serde(default)]
    pub start_time: Option<i64>,
    #[serde(default)]
    pub end_time: Option<i64>,
    #[serde(default)]
    pub result_location: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
}

impl TaskResponse {
    /// Wall-clock runtime from the controller's epoch-millisecond stamps.
    pub fn runtime(&self) -> Option<chrono::TimeDelta> {
        let start = chrono::DateTime::from_timestamp_millis(self.start_time?)?;
        let end = chrono::DateTime::from_timestamp_millis(self.end_time?)?;
        Some(end - start)
    }
}

/// Extra detail for a task, fetched when it fails.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetail {
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub progress: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

/// A device record from `GET /network-device`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDevice {
    pub id: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub management_ip_address: Option<String>,
    #[serde(default)]
    pub reachability_status: Option<String>,
    #[serde(default)]
    pub collection_status: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub platform_id: Option<String>,
    #[serde(default)]
    pub software_version: Option<String>,
}

/// Controller release information.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseInfo {
    #[serde(default)]
    pub display_version: Option<String>,
    #[serde(default)]
    pub installed_version: Option<String>,
}

/// Which side of a device's configuration to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigStage {
    /// What the controller believes the device currently runs.
    Deployed,
    /// Declared on the controller but not necessarily pushed.
    Intended,
}

impl ConfigStage {
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Deployed => "deployed",
            Self::Intended => "intended",
        }
    }
}

impl fmt::Display for ConfigStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// Error shapes the controller uses on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub response: Option<ErrorBody>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}
