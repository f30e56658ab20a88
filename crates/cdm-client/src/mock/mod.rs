//! Mock CdmClient for unit testing
//!
//! This module provides a mock implementation of CdmClientTrait that can be used
//! in unit tests without requiring a reachable appliance.
//!
//! The mock is organized into domain-specific modules:
//! - `cluster.rs` - cluster settings (timezone, NTP, syslog)
//! - `protection.rs` - hosts, fileset templates, filesets, SLA assignment
//! - `jobs.rs` - archival locations, on-demand snapshots, scripted job status

mod cluster;
mod jobs;
mod protection;

use crate::cdm_trait::CdmClientTrait;
use crate::error::CdmError;
use crate::models::*;
use crate::resolver::{ObjectType, single_match};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Mock CdmClient for testing
///
/// This mock stores resources in memory and can be configured to return
/// specific responses for testing different scenarios. Every mutating call is
/// recorded so tests can assert that a converged resource was left untouched.
#[derive(Clone)]
pub struct MockCdmClient {
    pub(crate) base_url: String,
    // In-memory storage for resources
    pub(crate) timezone: Arc<Mutex<String>>,
    pub(crate) ntp_servers: Arc<Mutex<Vec<String>>>,
    pub(crate) syslog_servers: Arc<Mutex<Vec<SyslogServer>>>,
    pub(crate) hosts: Arc<Mutex<HashMap<String, Host>>>,
    pub(crate) templates: Arc<Mutex<HashMap<String, FilesetTemplate>>>,
    pub(crate) filesets: Arc<Mutex<HashMap<String, Fileset>>>,
    pub(crate) vms: Arc<Mutex<HashMap<String, VirtualMachine>>>,
    pub(crate) sla_domains: Arc<Mutex<HashMap<String, String>>>,
    pub(crate) archival_locations: Arc<Mutex<HashMap<String, ObjectStoreLocation>>>,
    // Scripted job statuses, consumed front to back; the last one repeats
    pub(crate) jobs: Arc<Mutex<HashMap<String, VecDeque<TaskStatus>>>>,
    pub(crate) default_job_script: Arc<Mutex<Vec<TaskStatus>>>,
    pub(crate) job_polls: Arc<Mutex<HashMap<String, usize>>>,
    // Injected failures keyed by operation name
    pub(crate) failures: Arc<Mutex<HashMap<String, (u16, String)>>>,
    pub(crate) mutations: Arc<Mutex<Vec<String>>>,
    // Counter for generating IDs
    pub(crate) next_id: Arc<Mutex<u64>>,
}

impl MockCdmClient {
    /// Create a new mock client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timezone: Arc::new(Mutex::new("America/Los_Angeles".to_string())),
            ntp_servers: Arc::new(Mutex::new(Vec::new())),
            syslog_servers: Arc::new(Mutex::new(Vec::new())),
            hosts: Arc::new(Mutex::new(HashMap::new())),
            templates: Arc::new(Mutex::new(HashMap::new())),
            filesets: Arc::new(Mutex::new(HashMap::new())),
            vms: Arc::new(Mutex::new(HashMap::new())),
            sla_domains: Arc::new(Mutex::new(HashMap::new())),
            archival_locations: Arc::new(Mutex::new(HashMap::new())),
            jobs: Arc::new(Mutex::new(HashMap::new())),
            default_job_script: Arc::new(Mutex::new(vec![
                TaskStatus::Queued,
                TaskStatus::Running,
                TaskStatus::Succeeded,
            ])),
            job_polls: Arc::new(Mutex::new(HashMap::new())),
            failures: Arc::new(Mutex::new(HashMap::new())),
            mutations: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(Mutex::new(1)),
        }
    }

    /// Set the cluster timezone (for test setup)
    pub fn set_timezone(&self, timezone: impl Into<String>) {
        *self.timezone.lock().unwrap() = timezone.into();
    }

    /// Set the NTP server list (for test setup)
    pub fn set_ntp(&self, servers: Vec<String>) {
        *self.ntp_servers.lock().unwrap() = servers;
    }

    /// Add a syslog export target (for test setup)
    pub fn add_syslog(&self, server: SyslogServer) {
        self.syslog_servers.lock().unwrap().push(server);
    }

    /// Add a host to the mock store (for test setup)
    pub fn add_host(&self, host: Host) {
        self.hosts.lock().unwrap().insert(host.id.clone(), host);
    }

    /// Add a fileset template to the mock store (for test setup)
    pub fn add_template(&self, template: FilesetTemplate) {
        self.templates.lock().unwrap().insert(template.id.clone(), template);
    }

    /// Add a fileset to the mock store (for test setup)
    pub fn add_fileset(&self, fileset: Fileset) {
        self.filesets.lock().unwrap().insert(fileset.id.clone(), fileset);
    }

    /// Add a virtual machine to the mock store (for test setup)
    pub fn add_vm(&self, vm: VirtualMachine) {
        self.vms.lock().unwrap().insert(vm.id.clone(), vm);
    }

    /// Add an SLA Domain to the mock store (for test setup)
    pub fn add_sla_domain(&self, id: impl Into<String>, name: impl Into<String>) {
        self.sla_domains.lock().unwrap().insert(id.into(), name.into());
    }

    /// Add an archival location to the mock store (for test setup)
    pub fn add_archival_location(&self, location: ObjectStoreLocation) {
        self.archival_locations
            .lock()
            .unwrap()
            .insert(location.id.clone(), location);
    }

    /// Script the statuses `job_status` reports for `handle`
    ///
    /// Statuses are returned in order; once one remains it is repeated.
    pub fn script_job(&self, handle: impl Into<String>, statuses: Vec<TaskStatus>) {
        self.jobs
            .lock()
            .unwrap()
            .insert(handle.into(), statuses.into_iter().collect());
    }

    /// Script used for jobs the mock itself creates
    pub fn set_default_job_script(&self, statuses: Vec<TaskStatus>) {
        *self.default_job_script.lock().unwrap() = statuses;
    }

    /// Make `operation` (a trait method name) fail with an API error
    pub fn fail_on(&self, operation: &str, status: u16, message: impl Into<String>) {
        self.failures
            .lock()
            .unwrap()
            .insert(operation.to_string(), (status, message.into()));
    }

    /// Mutating calls made so far, as `operation:target` strings
    pub fn mutations(&self) -> Vec<String> {
        self.mutations.lock().unwrap().clone()
    }

    /// Number of times `job_status` was called for `handle`
    pub fn job_polls(&self, handle: &str) -> usize {
        self.job_polls.lock().unwrap().get(handle).copied().unwrap_or(0)
    }

    /// Current SLA assignment of a VM (for assertions)
    pub fn vm_assignment(&self, vm_id: &str) -> Option<Assignment> {
        self.vms
            .lock()
            .unwrap()
            .get(vm_id)
            .map(|vm| vm.configured_sla_domain_id.clone())
    }

    /// Generate next ID
    pub(crate) fn next_id(&self) -> u64 {
        let mut id = self.next_id.lock().unwrap();
        let current = *id;
        *id += 1;
        current
    }

    /// Return the injected failure for `operation`, if any
    pub(crate) fn check(&self, operation: &str) -> Result<(), CdmError> {
        match self.failures.lock().unwrap().get(operation) {
            Some((404, message)) => Err(CdmError::NotFound(message.clone())),
            Some((status, message)) => Err(CdmError::Api {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn record(&self, operation: &str, target: &str) {
        self.mutations
            .lock()
            .unwrap()
            .push(format!("{}:{}", operation, target));
    }

    fn summaries(&self, object_type: ObjectType) -> Vec<ObjectSummary> {
        let summary = |id: &String, name: &String| ObjectSummary {
            id: id.clone(),
            name: name.clone(),
        };
        match object_type {
            ObjectType::VmwareVm => self.vms.lock().unwrap().values().map(|v| summary(&v.id, &v.name)).collect(),
            ObjectType::SlaDomain => self.sla_domains.lock().unwrap().iter().map(|(id, name)| summary(id, name)).collect(),
            ObjectType::PhysicalHost => self.hosts.lock().unwrap().values().map(|h| summary(&h.id, &h.hostname)).collect(),
            ObjectType::Fileset => self.filesets.lock().unwrap().values().map(|f| summary(&f.id, &f.name)).collect(),
            ObjectType::FilesetTemplate => self.templates.lock().unwrap().values().map(|t| summary(&t.id, &t.name)).collect(),
            ObjectType::ArchivalLocation => self
                .archival_locations
                .lock()
                .unwrap()
                .values()
                .map(|l| summary(&l.id, &l.definition.name))
                .collect(),
        }
    }
}

#[async_trait::async_trait]
impl CdmClientTrait for MockCdmClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn validate_credentials(&self) -> Result<(), CdmError> {
        self.check("validate_credentials")
    }

    async fn resolve(&self, object_type: ObjectType, name: &str, _disambiguators: &[(&str, &str)]) -> Result<String, CdmError> {
        self.check("resolve")?;
        single_match(self.summaries(object_type), object_type, name, |s| s.name.as_str()).map(|s| s.id)
    }

    // Cluster operations - delegated to cluster module
    async fn cluster_timezone(&self) -> Result<String, CdmError> {
        cluster::cluster_timezone(self).await
    }

    async fn set_cluster_timezone(&self, timezone: &str) -> Result<ClusterInfo, CdmError> {
        cluster::set_cluster_timezone(self, timezone).await
    }

    async fn ntp_servers(&self) -> Result<Vec<String>, CdmError> {
        cluster::ntp_servers(self).await
    }

    async fn set_ntp_servers(&self, servers: &[String]) -> Result<(), CdmError> {
        cluster::set_ntp_servers(self, servers).await
    }

    async fn syslog_servers(&self) -> Result<Vec<SyslogServer>, CdmError> {
        cluster::syslog_servers(self).await
    }

    async fn add_syslog_server(&self, request: &SyslogServerRequest) -> Result<SyslogServer, CdmError> {
        cluster::add_syslog_server(self, request).await
    }

    // Protection operations - delegated to protection module
    async fn get_host_by_name(&self, hostname: &str) -> Result<Host, CdmError> {
        protection::get_host_by_name(self, hostname).await
    }

    async fn register_host(&self, request: &RegisterHostRequest) -> Result<Host, CdmError> {
        protection::register_host(self, request).await
    }

    async fn get_fileset_template(&self, name: &str, operating_system_type: &str) -> Result<FilesetTemplate, CdmError> {
        protection::get_fileset_template(self, name, operating_system_type).await
    }

    async fn create_fileset_template(&self, request: &FilesetTemplateRequest) -> Result<FilesetTemplate, CdmError> {
        protection::create_fileset_template(self, request).await
    }

    async fn get_fileset(&self, host_id: &str, template_id: &str) -> Result<Fileset, CdmError> {
        protection::get_fileset(self, host_id, template_id).await
    }

    async fn create_fileset(&self, host_id: &str, template_id: &str) -> Result<Fileset, CdmError> {
        protection::create_fileset(self, host_id, template_id).await
    }

    async fn vm_sla_assignment(&self, vm_id: &str) -> Result<Assignment, CdmError> {
        protection::vm_sla_assignment(self, vm_id).await
    }

    async fn assign_vm_sla(&self, vm_id: &str, assignment: &Assignment) -> Result<VirtualMachine, CdmError> {
        protection::assign_vm_sla(self, vm_id, assignment).await
    }

    async fn fileset_sla_assignment(&self, fileset_id: &str) -> Result<Assignment, CdmError> {
        protection::fileset_sla_assignment(self, fileset_id).await
    }

    async fn assign_fileset_sla(&self, fileset_id: &str, assignment: &Assignment) -> Result<Fileset, CdmError> {
        protection::assign_fileset_sla(self, fileset_id, assignment).await
    }

    // Archival and job operations - delegated to jobs module
    async fn get_archival_location(&self, name: &str) -> Result<ObjectStoreLocation, CdmError> {
        jobs::get_archival_location(self, name).await
    }

    async fn add_s3_archival_location(&self, request: &S3ArchiveRequest) -> Result<AsyncRequest, CdmError> {
        jobs::add_s3_archival_location(self, request).await
    }

    async fn vm_on_demand_snapshot(&self, vm_id: &str, sla_id: Option<&str>) -> Result<AsyncRequest, CdmError> {
        jobs::vm_on_demand_snapshot(self, vm_id, sla_id).await
    }

    async fn job_status(&self, handle: &TaskHandle) -> Result<AsyncRequest, CdmError> {
        jobs::job_status(self, handle).await
    }
}
