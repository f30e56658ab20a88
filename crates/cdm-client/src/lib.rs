//! CDM REST API Client
//!
//! A Rust client library for the CDM storage appliance REST API and its
//! cloud management plane GraphQL API.
//! Provides type-safe models and methods for cluster settings, protection
//! assignment, archival and on-demand jobs.
//!
//! # Example
//!
//! ```no_run
//! use cdm_client::{CdmClient, CdmClientTrait, Credentials, ObjectType};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a client
//! let client = CdmClient::new("10.0.1.10", Credentials::Token("your-api-token".to_string()))?;
//! client.validate_credentials().await?;
//!
//! // Read a cluster setting
//! let timezone = client.cluster_timezone().await?;
//!
//! // Resolve a VM by name and trigger an on-demand snapshot
//! let vm_id = client.resolve(ObjectType::VmwareVm, "web01", &[("primary_cluster_id", "local")]).await?;
//! let job = client.vm_on_demand_snapshot(&vm_id, None).await?;
//! let status = client.job_status(&job.task_handle()).await?;
//! # let _ = (timezone, status);
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Cluster settings**: timezone, NTP, syslog export
//! - **Protection**: hosts, fileset templates, filesets, SLA Domain assignment
//! - **Archival**: S3 object-store locations
//! - **Jobs**: on-demand snapshots and job status polling
//! - **Pagination**: Support for fetching all pages of large result sets
//! - **Cloud plane**: GraphQL queries with strict error surfacing

pub mod client;
pub mod common;
pub mod error;
pub mod graphql;
pub mod models;
pub mod resolver;
#[path = "trait.rs"]
pub mod cdm_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use cdm_trait::CdmClientTrait;
pub use client::{CdmClient, ClientOptions, DEFAULT_TIMEOUT_SECS};
pub use common::{ApiVersion, Credentials, HttpClient, PaginatedResponse};
pub use error::CdmError;
pub use graphql::CloudClient;
pub use models::*;
pub use resolver::ObjectType;
#[cfg(feature = "test-util")]
pub use mock::MockCdmClient;
