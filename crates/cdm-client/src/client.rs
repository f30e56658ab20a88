//! CDM API client
//!
//! Implements the CDM REST API client on top of [`HttpClient`].
//! Endpoints live under `/api/v1` and `/api/internal`.

use crate::common::query::query_resources;
use crate::common::{ApiVersion, Credentials, HttpClient, PaginatedResponse};
use crate::error::CdmError;
use crate::models::*;
use crate::cdm_trait::CdmClientTrait;
use crate::resolver::{self, ObjectType, single_match};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

/// Default request timeout, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Connection options for [`CdmClient`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Per-request timeout
    pub timeout: Duration,
    /// Accept self-signed certificates (appliances ship with them)
    pub accept_invalid_certs: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            accept_invalid_certs: true,
        }
    }
}

/// CDM API client
#[derive(Debug, Clone)]
pub struct CdmClient {
    http: HttpClient,
}

impl CdmClient {
    /// Create a new CDM client with default options
    ///
    /// # Arguments
    /// * `node` - node IP, hostname or full base URL (e.g. "10.0.1.10" or "https://cdm.lab")
    /// * `credentials` - API token or username/password
    pub fn new(node: &str, credentials: Credentials) -> Result<Self, CdmError> {
        Self::with_options(node, credentials, ClientOptions::default())
    }

    /// Create a new CDM client with explicit connection options
    pub fn with_options(node: &str, credentials: Credentials, options: ClientOptions) -> Result<Self, CdmError> {
        let client = Client::builder()
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .build()
            .map_err(CdmError::Http)?;

        Ok(Self {
            http: HttpClient::new(client, api_root(node), credentials),
        })
    }

    /// Underlying transport, for endpoints without a typed wrapper
    pub fn http(&self) -> &HttpClient {
        &self.http
    }
}

/// Normalise a node address into the API root URL
fn api_root(node: &str) -> String {
    let node = node.trim_end_matches('/');
    let base = if node.starts_with("http://") || node.starts_with("https://") {
        node.to_string()
    } else {
        format!("https://{}", node)
    };
    if base.ends_with("/api") {
        base
    } else {
        format!("{}/api", base)
    }
}

#[async_trait::async_trait]
impl CdmClientTrait for CdmClient {
    fn base_url(&self) -> &str {
        self.http.base_url()
    }

    async fn validate_credentials(&self) -> Result<(), CdmError> {
        debug!("Validating CDM credentials and connectivity");
        let _: serde_json::Value = self.http.get(ApiVersion::V1, "cluster/me").await?;
        debug!("Credentials validated successfully");
        Ok(())
    }

    async fn resolve(&self, object_type: ObjectType, name: &str, disambiguators: &[(&str, &str)]) -> Result<String, CdmError> {
        resolver::resolve(&self.http, object_type, name, disambiguators).await
    }

    async fn cluster_timezone(&self) -> Result<String, CdmError> {
        let cluster: ClusterInfo = self.http.get(ApiVersion::V1, "cluster/me").await?;
        Ok(cluster.timezone.timezone)
    }

    async fn set_cluster_timezone(&self, timezone: &str) -> Result<ClusterInfo, CdmError> {
        let body = json!({ "timezone": { "timezone": timezone } });
        let cluster: ClusterInfo = self.http.patch(ApiVersion::V1, "cluster/me", &body).await?;
        info!("Set cluster timezone to {}", cluster.timezone.timezone);
        Ok(cluster)
    }

    async fn ntp_servers(&self) -> Result<Vec<String>, CdmError> {
        let response: PaginatedResponse<String> =
            self.http.get(ApiVersion::Internal, "cluster/me/ntp_server").await?;
        Ok(response.data)
    }

    async fn set_ntp_servers(&self, servers: &[String]) -> Result<(), CdmError> {
        let body = serde_json::to_value(servers)?;
        self.http.post::<serde_json::Value>(ApiVersion::Internal, "cluster/me/ntp_server", &body).await?;
        info!("Set cluster NTP servers to {:?}", servers);
        Ok(())
    }

    async fn syslog_servers(&self) -> Result<Vec<SyslogServer>, CdmError> {
        query_resources(&self.http, ApiVersion::Internal, "syslog", &[], false).await
    }

    async fn add_syslog_server(&self, request: &SyslogServerRequest) -> Result<SyslogServer, CdmError> {
        let body = serde_json::to_value(request)?;
        let server: SyslogServer = self.http.post(ApiVersion::Internal, "syslog", &body).await?;
        info!("Added syslog export target {}:{}", server.hostname, server.port);
        Ok(server)
    }

    async fn get_host_by_name(&self, hostname: &str) -> Result<Host, CdmError> {
        let hosts: Vec<Host> = query_resources(
            &self.http,
            ApiVersion::V1,
            "host",
            &[("hostname", hostname), ("primary_cluster_id", "local")],
            true,
        )
        .await?;
        single_match(hosts, ObjectType::PhysicalHost, hostname, |h| h.hostname.as_str())
    }

    async fn register_host(&self, request: &RegisterHostRequest) -> Result<Host, CdmError> {
        let body = serde_json::to_value(request)?;
        let host: Host = self.http.post(ApiVersion::V1, "host", &body).await?;
        info!("Registered host {} (ID: {})", host.hostname, host.id);
        Ok(host)
    }

    async fn get_fileset_template(&self, name: &str, operating_system_type: &str) -> Result<FilesetTemplate, CdmError> {
        let templates: Vec<FilesetTemplate> = query_resources(
            &self.http,
            ApiVersion::V1,
            "fileset_template",
            &[
                ("name", name),
                ("operating_system_type", operating_system_type),
                ("primary_cluster_id", "local"),
            ],
            true,
        )
        .await?;
        single_match(templates, ObjectType::FilesetTemplate, name, |t| t.name.as_str())
    }

    async fn create_fileset_template(&self, request: &FilesetTemplateRequest) -> Result<FilesetTemplate, CdmError> {
        let body = serde_json::to_value(request)?;
        let template: FilesetTemplate = self.http.post(ApiVersion::V1, "fileset_template", &body).await?;
        info!("Created fileset template {} (ID: {})", template.name, template.id);
        Ok(template)
    }

    async fn get_fileset(&self, host_id: &str, template_id: &str) -> Result<Fileset, CdmError> {
        let filesets: Vec<Fileset> = query_resources(
            &self.http,
            ApiVersion::V1,
            "fileset",
            &[("host_id", host_id), ("template_id", template_id), ("primary_cluster_id", "local")],
            true,
        )
        .await?;
        // The list filters are exact for ids; more than one means duplicates on the host
        let count = filesets.len();
        match (filesets.into_iter().next(), count) {
            (None, _) => Err(CdmError::NotFound(format!(
                "fileset for host {} and template {}",
                host_id, template_id
            ))),
            (Some(fileset), 1) => Ok(fileset),
            (Some(_), count) => Err(CdmError::AmbiguousMatch {
                object_type: ObjectType::Fileset.to_string(),
                name: format!("{}/{}", host_id, template_id),
                count,
            }),
        }
    }

    async fn create_fileset(&self, host_id: &str, template_id: &str) -> Result<Fileset, CdmError> {
        let body = json!({ "hostId": host_id, "templateId": template_id });
        let fileset: Fileset = self.http.post(ApiVersion::V1, "fileset", &body).await?;
        info!("Created fileset {} (ID: {})", fileset.name, fileset.id);
        Ok(fileset)
    }

    async fn vm_sla_assignment(&self, vm_id: &str) -> Result<Assignment, CdmError> {
        let vm: VirtualMachine = self.http.get(ApiVersion::V1, &format!("vmware/vm/{}", vm_id)).await?;
        Ok(vm.configured_sla_domain_id)
    }

    async fn assign_vm_sla(&self, vm_id: &str, assignment: &Assignment) -> Result<VirtualMachine, CdmError> {
        let body = json!({ "configuredSlaDomainId": assignment.as_wire() });
        let vm: VirtualMachine = self
            .http
            .patch(ApiVersion::V1, &format!("vmware/vm/{}", vm_id), &body)
            .await?;
        info!("Assigned VM {} to SLA {}", vm.name, vm.configured_sla_domain_id);
        Ok(vm)
    }

    async fn fileset_sla_assignment(&self, fileset_id: &str) -> Result<Assignment, CdmError> {
        let fileset: Fileset = self.http.get(ApiVersion::V1, &format!("fileset/{}", fileset_id)).await?;
        fileset
            .configured_sla_domain_id
            .ok_or_else(|| CdmError::NotFound(format!("SLA assignment of fileset {}", fileset_id)))
    }

    async fn assign_fileset_sla(&self, fileset_id: &str, assignment: &Assignment) -> Result<Fileset, CdmError> {
        let body = json!({ "configuredSlaDomainId": assignment.as_wire() });
        let fileset: Fileset = self
            .http
            .patch(ApiVersion::V1, &format!("fileset/{}", fileset_id), &body)
            .await?;
        info!("Assigned fileset {} to SLA {}", fileset.name, assignment);
        Ok(fileset)
    }

    async fn get_archival_location(&self, name: &str) -> Result<ObjectStoreLocation, CdmError> {
        let (version, endpoint) = ObjectType::ArchivalLocation.endpoint();
        let locations: Vec<ObjectStoreLocation> = query_resources(&self.http, version, endpoint, &[], true).await?;
        single_match(locations, ObjectType::ArchivalLocation, name, |l| l.definition.name.as_str())
    }

    async fn add_s3_archival_location(&self, request: &S3ArchiveRequest) -> Result<AsyncRequest, CdmError> {
        let body = serde_json::to_value(request)?;
        let (version, endpoint) = ObjectType::ArchivalLocation.endpoint();
        let job: AsyncRequest = self.http.post(version, endpoint, &body).await?;
        info!("Requested S3 archival location {} (job {})", request.name, job.id);
        Ok(job)
    }

    async fn vm_on_demand_snapshot(&self, vm_id: &str, sla_id: Option<&str>) -> Result<AsyncRequest, CdmError> {
        let body = match sla_id {
            Some(sla_id) => json!({ "slaId": sla_id }),
            None => json!({}),
        };
        let job: AsyncRequest = self
            .http
            .post(ApiVersion::V1, &format!("vmware/vm/{}/snapshot", vm_id), &body)
            .await?;
        info!("Requested on-demand snapshot of VM {} (job {})", vm_id, job.id);
        Ok(job)
    }

    async fn job_status(&self, handle: &TaskHandle) -> Result<AsyncRequest, CdmError> {
        self.http.get_link(handle.as_str()).await
    }
}
