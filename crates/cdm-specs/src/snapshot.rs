//! On-demand snapshots

use crate::error::SpecError;
use crate::validation;
use serde::{Deserialize, Serialize};

/// Take an on-demand snapshot of a VM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSpec {
    pub vm: String,
    /// SLA Domain whose retention applies to the snapshot; the VM's own
    /// SLA Domain when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sla: Option<String>,
}

impl SnapshotSpec {
    pub fn validate(&self, field: &str) -> Result<(), SpecError> {
        validation::non_empty(&format!("{}.vm", field), &self.vm)?;
        if let Some(sla) = &self.sla {
            validation::non_empty(&format!("{}.sla", field), sla)?;
        }
        Ok(())
    }
}
