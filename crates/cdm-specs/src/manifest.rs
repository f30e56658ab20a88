//! Desired-state manifest
//!
//! A single YAML document bundling every resource to reconcile:
//!
//! ```yaml
//! cluster:
//!   timezone: America/Chicago
//!   ntpServers: [0.pool.ntp.org, 1.pool.ntp.org]
//!   syslog:
//!     - hostname: logs.lab
//!       protocol: TCP
//! hosts:
//!   - hostname: db01.lab
//! filesetTemplates:
//!   - name: etc
//!     includes: [/etc]
//! filesets:
//!   - hostname: db01.lab
//!     template: etc
//!     sla: Silver
//! slaAssignments:
//!   - vm: web01
//!     sla: Gold
//! archivalLocations:
//!   - name: aws-archive
//!     bucket: cdm-archive
//!     region: us-east-1
//!     accessKey: AKIA...
//!     secretKey: ...
//! snapshots:
//!   - vm: web01
//! ```

use crate::archival::S3ArchiveSpec;
use crate::cluster::ClusterSpec;
use crate::error::SpecError;
use crate::fileset::{FilesetSpec, FilesetTemplateSpec};
use crate::host::HostSpec;
use crate::sla::SlaAssignmentSpec;
use crate::snapshot::SnapshotSpec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub cluster: ClusterSpec,
    #[serde(default)]
    pub hosts: Vec<HostSpec>,
    #[serde(default)]
    pub fileset_templates: Vec<FilesetTemplateSpec>,
    #[serde(default)]
    pub filesets: Vec<FilesetSpec>,
    #[serde(default)]
    pub sla_assignments: Vec<SlaAssignmentSpec>,
    #[serde(default)]
    pub archival_locations: Vec<S3ArchiveSpec>,
    #[serde(default)]
    pub snapshots: Vec<SnapshotSpec>,
}

impl Manifest {
    /// Parse and validate a manifest document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SpecError> {
        let manifest: Manifest = serde_yaml::from_str(yaml)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Read, parse and validate a manifest file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SpecError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Validate every entry; the first invalid field is reported
    pub fn validate(&self) -> Result<(), SpecError> {
        self.cluster.validate()?;
        for (i, host) in self.hosts.iter().enumerate() {
            host.validate(&format!("hosts[{}]", i))?;
        }
        for (i, template) in self.fileset_templates.iter().enumerate() {
            template.validate(&format!("filesetTemplates[{}]", i))?;
        }
        for (i, fileset) in self.filesets.iter().enumerate() {
            fileset.validate(&format!("filesets[{}]", i))?;
        }
        for (i, assignment) in self.sla_assignments.iter().enumerate() {
            assignment.validate(&format!("slaAssignments[{}]", i))?;
        }
        for (i, location) in self.archival_locations.iter().enumerate() {
            location.validate(&format!("archivalLocations[{}]", i))?;
        }
        for (i, snapshot) in self.snapshots.iter().enumerate() {
            snapshot.validate(&format!("snapshots[{}]", i))?;
        }

        unique("hosts", self.hosts.iter().map(|h| h.hostname.clone()))?;
        unique(
            "filesetTemplates",
            self.fileset_templates
                .iter()
                .map(|t| format!("{} ({})", t.name, t.operating_system)),
        )?;
        unique("slaAssignments", self.sla_assignments.iter().map(|a| a.vm.clone()))?;
        unique("archivalLocations", self.archival_locations.iter().map(|a| a.name.clone()))?;
        Ok(())
    }

    /// Whether the manifest declares nothing to reconcile
    pub fn is_empty(&self) -> bool {
        self.cluster == ClusterSpec::default()
            && self.hosts.is_empty()
            && self.fileset_templates.is_empty()
            && self.filesets.is_empty()
            && self.sla_assignments.is_empty()
            && self.archival_locations.is_empty()
            && self.snapshots.is_empty()
    }
}

/// Reject a section that declares the same resource twice
fn unique(field: &str, keys: impl Iterator<Item = String>) -> Result<(), SpecError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key.clone()) {
            return Err(SpecError::validation(field, format!("'{}' is declared more than once", key)));
        }
    }
    Ok(())
}
