//! Applier error types.
//!
//! Errors that abort a run. Per-resource failures do not abort; they are
//! collected in the [`ApplyReport`](crate::applier::ApplyReport) and turned
//! into [`ApplyError::Incomplete`] at the end of the run.

use cdm_client::CdmError;
use cdm_ops::MonitorError;
use cdm_specs::SpecError;
use thiserror::Error;

/// Errors that can occur in the CDM applier.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Manifest could not be read or failed validation
    #[error("Manifest error: {0}")]
    Spec(#[from] SpecError),

    /// CDM API error outside any single resource (client setup, credentials)
    #[error("CDM error: {0}")]
    Cdm(#[from] CdmError),

    /// Job monitoring could not start
    #[error("Job monitoring failed: {0}")]
    Monitor(#[from] MonitorError),

    /// The run finished but some resources or jobs did not converge
    #[error("{failed} resource(s) failed and {jobs_failed} job(s) did not succeed")]
    Incomplete { failed: usize, jobs_failed: usize },
}
