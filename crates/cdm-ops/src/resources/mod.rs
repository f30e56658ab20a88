//! Per-resource reconcilers
//!
//! Each `ensure_*` function validates its input, builds the desired field map,
//! and hands a fetch future, an explicit comparison policy and an apply
//! future to the reconciler. Operations that start appliance jobs return the
//! job's [`TaskHandle`](cdm_client::TaskHandle) for the task monitor.

use crate::comparison::Comparison;
use crate::state::{CurrentState, DesiredState};
use cdm_client::CdmError;
use serde::Serialize;

/// Unwrap a preparation step or end the reconciliation as `Failed`
macro_rules! try_outcome {
    ($resource:expr, $result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => return $crate::reconciler::ReconciliationOutcome::failed($resource, e),
        }
    };
}

pub mod archival;
pub mod cluster;
pub mod fileset;
pub mod host;
pub mod sla;
pub mod snapshot;

pub use archival::ensure_s3_archival_location;
pub use cluster::{ensure_ntp_servers, ensure_syslog_server, ensure_timezone};
pub use fileset::{ensure_fileset, ensure_fileset_template};
pub use host::ensure_host;
pub use sla::{ensure_fileset_sla, ensure_vm_sla, resolve_assignment};
pub use snapshot::take_on_demand_snapshot;

/// Current state of a fetched API object, keyed by its wire field names
pub(crate) fn current_of<T: Serialize>(value: &T) -> Result<Option<CurrentState>, CdmError> {
    CurrentState::from_serialize(value)
        .map(Some)
        .map_err(CdmError::Serialization)
}

/// Pass the current state through unless it conflicts with `desired`
///
/// For objects the appliance cannot update in place. A same-named object whose
/// compared fields differ is reported as `InvalidRequest`, so the apply call
/// never creates a second object under that name.
pub(crate) fn reject_conflict(
    resource: &str,
    desired: &DesiredState,
    comparison: &Comparison,
    current: Option<CurrentState>,
) -> Result<Option<CurrentState>, CdmError> {
    if let Some(state) = &current {
        let drift = comparison.differences(desired, state);
        if !drift.is_empty() {
            return Err(CdmError::InvalidRequest(format!(
                "{} exists with a different {} and cannot be updated in place",
                resource,
                drift.join(", ")
            )));
        }
    }
    Ok(current)
}
