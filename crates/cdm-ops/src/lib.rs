//! CDM Operations
//!
//! Declarative configuration of a CDM appliance on top of [`cdm_client`]:
//!
//! - [`reconcile`]: fetch, compare, apply only on difference
//! - [`resources`]: one `ensure_*` function per manageable resource
//! - [`TaskMonitor`]: polls many job handles to completion with a bounded
//!   worker pool
//!
//! # Example
//!
//! ```no_run
//! use cdm_client::{CdmClient, CdmClientTrait, Credentials};
//! use cdm_ops::{JobStatusSource, MonitorConfig, TaskMonitor, resources};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = Credentials::Token("token".to_string());
//! let client: Arc<dyn CdmClientTrait> = Arc::new(CdmClient::new("cdm-node01", credentials)?);
//! let outcome = resources::ensure_timezone(client.as_ref(), "America/Chicago").await;
//! println!("applied: {}", outcome.is_applied());
//!
//! let monitor = TaskMonitor::new(Arc::new(JobStatusSource::new(client)), MonitorConfig::default());
//! let reports = monitor.monitor(vec!["job-1".into()]).await?;
//! # let _ = reports;
//! # Ok(())
//! # }
//! ```

pub mod comparison;
pub mod error;
pub mod monitor;
#[cfg(test)]
mod monitor_test;
pub mod reconciler;
#[cfg(test)]
mod reconciler_test;
pub mod resources;
pub mod state;

pub use comparison::Comparison;
pub use error::{MonitorError, ReconcileError};
pub use monitor::{
    DEFAULT_MAX_WORKERS, DEFAULT_POLL_INTERVAL, JobStatusSource, MonitorConfig, MonitorSummary, TaskMonitor, TaskReport,
    TaskResult, TaskStatusSource,
};
pub use reconciler::{ReconciliationOutcome, reconcile, reconcile_new, reconcile_state};
pub use state::{CurrentState, DesiredState};
