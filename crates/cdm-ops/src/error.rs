//! Reconciliation and monitoring errors

use cdm_client::{CdmError, TaskHandle};
use cdm_specs::SpecError;
use std::time::Duration;
use thiserror::Error;

/// Why a reconciliation ended in `Failed`
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Fetching current state or applying the change failed remotely
    #[error("CDM error: {0}")]
    Client(#[from] CdmError),

    /// The desired state was rejected before any remote call
    #[error("Validation failed: {0}")]
    Validation(#[from] SpecError),

    /// Desired or current state could not be turned into a field map
    #[error("State conversion failed: {0}")]
    State(#[from] serde_json::Error),
}

/// Errors reported by the task monitor
///
/// Every variant except `NoHandles` belongs to exactly one handle and only
/// ever appears in that handle's entry of the result list.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// `monitor` was called with an empty handle list
    #[error("no task handles to monitor")]
    NoHandles,

    /// The status source failed for this handle
    #[error("status check for {handle} failed: {source}")]
    Status {
        handle: TaskHandle,
        #[source]
        source: CdmError,
    },

    /// The handle did not reach a terminal status in time
    #[error("{handle} did not finish within {after:?}")]
    TimedOut { handle: TaskHandle, after: Duration },

    /// Monitoring was cancelled before the handle finished
    #[error("monitoring of {handle} was cancelled")]
    Cancelled { handle: TaskHandle },

    /// The worker polling this handle panicked or was aborted
    #[error("worker for {handle} failed: {reason}")]
    Worker { handle: TaskHandle, reason: String },
}

impl MonitorError {
    /// Handle the error belongs to
    pub fn handle(&self) -> Option<&TaskHandle> {
        match self {
            MonitorError::NoHandles => None,
            MonitorError::Status { handle, .. }
            | MonitorError::TimedOut { handle, .. }
            | MonitorError::Cancelled { handle }
            | MonitorError::Worker { handle, .. } => Some(handle),
        }
    }
}
