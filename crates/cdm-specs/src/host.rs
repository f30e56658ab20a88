//! Physical hosts

use crate::error::SpecError;
use crate::validation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating system family of a host or fileset template
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostOs {
    #[default]
    Linux,
    Windows,
}

impl HostOs {
    /// Value of the API's `operatingSystemType` field
    pub fn as_str(self) -> &'static str {
        match self {
            HostOs::Linux => "Linux",
            HostOs::Windows => "Windows",
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host to register with the cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSpec {
    /// Hostname or IP address the cluster uses to reach the backup agent
    pub hostname: String,

    /// Whether the backup agent is installed on the host
    #[serde(default = "default_has_agent")]
    pub has_agent: bool,
}

fn default_has_agent() -> bool {
    true
}

impl HostSpec {
    pub fn validate(&self, field: &str) -> Result<(), SpecError> {
        validation::hostname(&format!("{}.hostname", field), &self.hostname)
    }
}
