//! SLA Domain references and assignments
//!
//! Manifests name SLA Domains; the two protection sentinels are spelled the
//! way the appliance spells them.

use crate::error::SpecError;
use crate::validation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to the protection an object should have
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SlaRef {
    /// `UNPROTECTED`: stop protecting the object
    Unprotected,
    /// `INHERIT`: take the SLA Domain of the parent object
    Inherit,
    /// An SLA Domain, by name
    Named(String),
}

impl SlaRef {
    pub fn validate(&self, field: &str) -> Result<(), SpecError> {
        match self {
            SlaRef::Named(name) => validation::non_empty(field, name),
            _ => Ok(()),
        }
    }
}

impl From<String> for SlaRef {
    fn from(value: String) -> Self {
        match value.as_str() {
            "UNPROTECTED" => SlaRef::Unprotected,
            "INHERIT" => SlaRef::Inherit,
            _ => SlaRef::Named(value),
        }
    }
}

impl From<SlaRef> for String {
    fn from(value: SlaRef) -> Self {
        match value {
            SlaRef::Unprotected => "UNPROTECTED".to_string(),
            SlaRef::Inherit => "INHERIT".to_string(),
            SlaRef::Named(name) => name,
        }
    }
}

impl fmt::Display for SlaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlaRef::Unprotected => f.write_str("UNPROTECTED"),
            SlaRef::Inherit => f.write_str("INHERIT"),
            SlaRef::Named(name) => f.write_str(name),
        }
    }
}

/// Assign a VMware VM to an SLA Domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaAssignmentSpec {
    /// VM name as shown in the appliance inventory
    pub vm: String,
    pub sla: SlaRef,
}

impl SlaAssignmentSpec {
    pub fn validate(&self, field: &str) -> Result<(), SpecError> {
        validation::non_empty(&format!("{}.vm", field), &self.vm)?;
        self.sla.validate(&format!("{}.sla", field))
    }
}
