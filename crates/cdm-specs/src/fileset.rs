//! Fileset templates and filesets

use crate::error::SpecError;
use crate::host::HostOs;
use crate::sla::SlaRef;
use crate::validation;
use serde::{Deserialize, Serialize};

/// Fileset template: a named set of include/exclude path patterns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesetTemplateSpec {
    pub name: String,
    #[serde(default)]
    pub operating_system: HostOs,
    pub includes: Vec<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
    /// Paths excluded from the excludes
    #[serde(default)]
    pub exceptions: Vec<String>,
}

impl FilesetTemplateSpec {
    pub fn validate(&self, field: &str) -> Result<(), SpecError> {
        validation::non_empty(&format!("{}.name", field), &self.name)?;
        if self.includes.is_empty() {
            return Err(SpecError::validation(
                format!("{}.includes", field),
                "must list at least one path",
            ));
        }
        Ok(())
    }
}

/// Fileset: a template applied to a host, optionally with an SLA Domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesetSpec {
    pub hostname: String,
    pub template: String,
    /// Operating system of the template (templates are unique per OS)
    #[serde(default)]
    pub operating_system: HostOs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sla: Option<SlaRef>,
}

impl FilesetSpec {
    pub fn validate(&self, field: &str) -> Result<(), SpecError> {
        validation::hostname(&format!("{}.hostname", field), &self.hostname)?;
        validation::non_empty(&format!("{}.template", field), &self.template)?;
        if let Some(sla) = &self.sla {
            sla.validate(&format!("{}.sla", field))?;
        }
        Ok(())
    }
}
