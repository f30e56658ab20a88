//! CdmClient trait for mocking
//!
//! This trait abstracts the CdmClient to enable mocking in unit tests.
//! The concrete CdmClient implements this trait, and tests can use mock implementations.

use crate::error::CdmError;
use crate::models::*;
use crate::resolver::ObjectType;

/// Trait for CDM API client operations
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
/// Lookups of a single object return `CdmError::NotFound` when it does not exist
/// and `CdmError::AmbiguousMatch` when more than one object carries the name.
#[async_trait::async_trait]
pub trait CdmClientTrait: Send + Sync {
    /// Get the base URL
    fn base_url(&self) -> &str;

    /// Validate the credentials with a lightweight authenticated request
    async fn validate_credentials(&self) -> Result<(), CdmError>;

    /// Resolve an object name to its id
    async fn resolve(&self, object_type: ObjectType, name: &str, disambiguators: &[(&str, &str)]) -> Result<String, CdmError>;

    // Cluster
    async fn cluster_timezone(&self) -> Result<String, CdmError>;
    async fn set_cluster_timezone(&self, timezone: &str) -> Result<ClusterInfo, CdmError>;
    async fn ntp_servers(&self) -> Result<Vec<String>, CdmError>;
    async fn set_ntp_servers(&self, servers: &[String]) -> Result<(), CdmError>;
    async fn syslog_servers(&self) -> Result<Vec<SyslogServer>, CdmError>;
    async fn add_syslog_server(&self, request: &SyslogServerRequest) -> Result<SyslogServer, CdmError>;

    // Hosts and filesets
    async fn get_host_by_name(&self, hostname: &str) -> Result<Host, CdmError>;
    async fn register_host(&self, request: &RegisterHostRequest) -> Result<Host, CdmError>;
    async fn get_fileset_template(&self, name: &str, operating_system_type: &str) -> Result<FilesetTemplate, CdmError>;
    async fn create_fileset_template(&self, request: &FilesetTemplateRequest) -> Result<FilesetTemplate, CdmError>;
    async fn get_fileset(&self, host_id: &str, template_id: &str) -> Result<Fileset, CdmError>;
    async fn create_fileset(&self, host_id: &str, template_id: &str) -> Result<Fileset, CdmError>;

    // SLA Domain assignment
    async fn vm_sla_assignment(&self, vm_id: &str) -> Result<Assignment, CdmError>;
    async fn assign_vm_sla(&self, vm_id: &str, assignment: &Assignment) -> Result<VirtualMachine, CdmError>;
    async fn fileset_sla_assignment(&self, fileset_id: &str) -> Result<Assignment, CdmError>;
    async fn assign_fileset_sla(&self, fileset_id: &str, assignment: &Assignment) -> Result<Fileset, CdmError>;

    // Archival
    async fn get_archival_location(&self, name: &str) -> Result<ObjectStoreLocation, CdmError>;
    async fn add_s3_archival_location(&self, request: &S3ArchiveRequest) -> Result<AsyncRequest, CdmError>;

    // On-demand jobs
    async fn vm_on_demand_snapshot(&self, vm_id: &str, sla_id: Option<&str>) -> Result<AsyncRequest, CdmError>;
    async fn job_status(&self, handle: &TaskHandle) -> Result<AsyncRequest, CdmError>;
}
