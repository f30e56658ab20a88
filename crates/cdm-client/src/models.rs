//! CDM API models
//!
//! These models match the JSON bodies of the CDM REST API (`/api/v1`,
//! `/api/internal`). Only the fields this crate reads or writes are modelled;
//! unknown fields are ignored on deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire value meaning "do not protect this object"
pub const UNPROTECTED_SENTINEL: &str = "UNPROTECTED";

/// Wire value meaning "inherit protection from the parent object"
pub const INHERIT_SENTINEL: &str = "INHERIT";

/// SLA Domain assignment of a protectable object
///
/// The API overloads `configuredSlaDomainId` with sentinel strings. This type
/// keeps the three states apart; absence is expressed with `Option<Assignment>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Assignment {
    /// Object is explicitly unprotected
    Unprotected,
    /// Object inherits its SLA Domain from its parent
    Inherited,
    /// Object is assigned to the SLA Domain with this id
    Explicit(String),
}

impl Assignment {
    /// Wire representation
    pub fn as_wire(&self) -> &str {
        match self {
            Assignment::Unprotected => UNPROTECTED_SENTINEL,
            Assignment::Inherited => INHERIT_SENTINEL,
            Assignment::Explicit(id) => id,
        }
    }
}

impl From<String> for Assignment {
    fn from(value: String) -> Self {
        match value.as_str() {
            UNPROTECTED_SENTINEL => Assignment::Unprotected,
            INHERIT_SENTINEL => Assignment::Inherited,
            _ => Assignment::Explicit(value),
        }
    }
}

impl From<&str> for Assignment {
    fn from(value: &str) -> Self {
        Assignment::from(value.to_string())
    }
}

impl From<Assignment> for String {
    fn from(value: Assignment) -> Self {
        match value {
            Assignment::Explicit(id) => id,
            other => other.as_wire().to_string(),
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Opaque reference to a long-running job
///
/// Usually the `href` of the `self` link of an async request, otherwise the
/// request id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskHandle(String);

impl TaskHandle {
    /// Wrap a self-link href or request id
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw handle value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskHandle {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Terminal outcome of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalStatus {
    /// The job completed successfully
    Succeeded,
    /// The job failed or was cancelled
    Failed,
}

/// Status of a job as reported by the appliance
///
/// Only `Succeeded` and `Failed` are terminal. Unrecognised values are kept
/// verbatim in `Other` and treated as still in progress.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    /// Accepted, not yet started
    Queued,
    /// In progress
    Running,
    /// Finished successfully
    Succeeded,
    /// Finished unsuccessfully or cancelled
    Failed,
    /// Any other appliance status, kept verbatim
    Other(String),
}

impl TaskStatus {
    /// Parse an appliance status string
    pub fn from_wire(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "QUEUED" | "PENDING" => TaskStatus::Queued,
            "RUNNING" | "ACQUIRING" | "FINISHING" => TaskStatus::Running,
            "SUCCEEDED" | "SUCCESS" | "SUCCESSFUL" => TaskStatus::Succeeded,
            "FAILED" | "FAILURE" | "CANCELED" | "CANCELLED" => TaskStatus::Failed,
            _ => TaskStatus::Other(value.to_string()),
        }
    }

    /// Terminal outcome, if this status is terminal
    pub fn terminal(&self) -> Option<TerminalStatus> {
        match self {
            TaskStatus::Succeeded => Some(TerminalStatus::Succeeded),
            TaskStatus::Failed => Some(TerminalStatus::Failed),
            _ => None,
        }
    }

    /// Whether this status ends polling
    pub fn is_terminal(&self) -> bool {
        self.terminal().is_some()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Queued => f.write_str("QUEUED"),
            TaskStatus::Running => f.write_str("RUNNING"),
            TaskStatus::Succeeded => f.write_str("SUCCEEDED"),
            TaskStatus::Failed => f.write_str("FAILED"),
            TaskStatus::Other(s) => f.write_str(s),
        }
    }
}

/// Hypermedia link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub rel: String,
}

/// Error detail of a failed async request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsyncRequestError {
    pub message: String,
}

/// Async request summary returned by job-triggering endpoints and by job
/// status polling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsyncRequest {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub error: Option<AsyncRequestError>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl AsyncRequest {
    /// Handle used to poll this request
    pub fn task_handle(&self) -> TaskHandle {
        self.links
            .iter()
            .find(|link| link.rel == "self")
            .map(|link| TaskHandle::new(link.href.clone()))
            .unwrap_or_else(|| TaskHandle::new(self.id.clone()))
    }

    /// Parsed status of this request
    pub fn task_status(&self) -> TaskStatus {
        TaskStatus::from_wire(&self.status)
    }
}

/// Timezone block of the cluster object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimezoneSetting {
    pub timezone: String,
}

/// Cluster summary (`/v1/cluster/me`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterInfo {
    pub id: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub timezone: TimezoneSetting,
}

/// Syslog export target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyslogServer {
    #[serde(default)]
    pub id: Option<String>,
    pub hostname: String,
    pub port: u16,
    pub protocol: String,
}

/// Body for adding a syslog export target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyslogServerRequest {
    pub hostname: String,
    pub port: u16,
    pub protocol: String,
}

/// Physical host registered with the cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    pub id: String,
    pub hostname: String,
    #[serde(default)]
    pub operating_system: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Body for registering a host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterHostRequest {
    pub hostname: String,
    pub has_agent: bool,
}

/// Fileset template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesetTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub operating_system_type: Option<String>,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
    #[serde(default)]
    pub exceptions: Vec<String>,
}

/// Body for creating a fileset template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesetTemplateRequest {
    pub name: String,
    pub operating_system_type: String,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub exceptions: Vec<String>,
}

/// Fileset (template applied to a host)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fileset {
    pub id: String,
    pub name: String,
    pub host_id: String,
    pub template_id: String,
    #[serde(default)]
    pub configured_sla_domain_id: Option<Assignment>,
}

/// VMware virtual machine (protection-relevant fields only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachine {
    pub id: String,
    pub name: String,
    pub configured_sla_domain_id: Assignment,
    #[serde(default)]
    pub effective_sla_domain_name: Option<String>,
}

/// Definition block of an object-store archival location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectStoreDefinition {
    pub name: String,
    pub bucket: String,
    pub access_key: String,
    #[serde(default)]
    pub default_region: Option<String>,
    #[serde(default)]
    pub storage_class: Option<String>,
    #[serde(default)]
    pub object_store_type: Option<String>,
}

/// Object-store archival location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectStoreLocation {
    pub id: String,
    pub definition: ObjectStoreDefinition,
}

/// Body for adding an S3 archival location
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3ArchiveRequest {
    pub name: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub default_region: String,
    pub storage_class: String,
    pub object_store_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kms_master_key_id: Option<String>,
}

impl fmt::Debug for S3ArchiveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3ArchiveRequest")
            .field("name", &self.name)
            .field("bucket", &self.bucket)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("default_region", &self.default_region)
            .field("storage_class", &self.storage_class)
            .field("object_store_type", &self.object_store_type)
            .field("kms_master_key_id", &self.kms_master_key_id)
            .finish()
    }
}

/// Minimal `{id, name}` projection used by name lookups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub id: String,
    #[serde(alias = "hostname")]
    pub name: String,
}

impl From<ObjectStoreLocation> for ObjectSummary {
    fn from(location: ObjectStoreLocation) -> Self {
        Self {
            id: location.id,
            name: location.definition.name,
        }
    }
}
