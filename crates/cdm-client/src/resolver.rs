//! Name to id resolution
//!
//! Most mutating endpoints take opaque object ids while operators think in
//! names. The resolver runs a filtered list query and insists on exactly one
//! exact-name match.

use crate::common::query::query_resources;
use crate::common::{ApiVersion, HttpClient};
use crate::error::CdmError;
use crate::models::{ObjectStoreLocation, ObjectSummary};
use std::fmt;
use tracing::debug;

/// Remote object types that can be looked up by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    VmwareVm,
    SlaDomain,
    PhysicalHost,
    Fileset,
    FilesetTemplate,
    ArchivalLocation,
}

impl ObjectType {
    /// List endpoint for this type
    pub fn endpoint(self) -> (ApiVersion, &'static str) {
        match self {
            ObjectType::VmwareVm => (ApiVersion::V1, "vmware/vm"),
            ObjectType::SlaDomain => (ApiVersion::V1, "sla_domain"),
            ObjectType::PhysicalHost => (ApiVersion::V1, "host"),
            ObjectType::Fileset => (ApiVersion::V1, "fileset"),
            ObjectType::FilesetTemplate => (ApiVersion::V1, "fileset_template"),
            ObjectType::ArchivalLocation => (ApiVersion::Internal, "archive/object_store"),
        }
    }

    /// Query parameter used to filter by name
    pub fn name_filter(self) -> &'static str {
        match self {
            ObjectType::PhysicalHost => "hostname",
            _ => "name",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ObjectType::VmwareVm => "vmware_vm",
            ObjectType::SlaDomain => "sla_domain",
            ObjectType::PhysicalHost => "physical_host",
            ObjectType::Fileset => "fileset",
            ObjectType::FilesetTemplate => "fileset_template",
            ObjectType::ArchivalLocation => "archival_location",
        };
        f.write_str(label)
    }
}

/// Resolve `name` to the id of exactly one `object_type` object
///
/// `disambiguators` are extra filters appended to the query, such as
/// `("primary_cluster_id", "local")` or `("host_id", ...)`.
pub async fn resolve(
    http: &HttpClient,
    object_type: ObjectType,
    name: &str,
    disambiguators: &[(&str, &str)],
) -> Result<String, CdmError> {
    let (version, endpoint) = object_type.endpoint();
    debug!("Resolving {} '{}'", object_type, name);

    let candidates: Vec<ObjectSummary> = match object_type {
        // Object stores take no name filter and nest the name in `definition`
        ObjectType::ArchivalLocation => {
            let locations: Vec<ObjectStoreLocation> =
                query_resources(http, version, endpoint, disambiguators, true).await?;
            locations.into_iter().map(ObjectSummary::from).collect()
        }
        _ => {
            let mut filters = vec![(object_type.name_filter(), name)];
            filters.extend_from_slice(disambiguators);
            query_resources(http, version, endpoint, &filters, true).await?
        }
    };
    single_match(candidates, object_type, name, |c| c.name.as_str()).map(|c| c.id)
}

/// Keep the single candidate whose name equals `name` exactly
///
/// The API filters are substring matches, so the result list is narrowed here.
pub fn single_match<T>(
    candidates: Vec<T>,
    object_type: ObjectType,
    name: &str,
    name_of: impl Fn(&T) -> &str,
) -> Result<T, CdmError> {
    let mut matches: Vec<T> = candidates.into_iter().filter(|c| name_of(c) == name).collect();
    match matches.len() {
        0 => Err(CdmError::NotFound(format!("{} '{}'", object_type, name))),
        1 => Ok(matches.remove(0)),
        count => Err(CdmError::AmbiguousMatch {
            object_type: object_type.to_string(),
            name: name.to_string(),
            count,
        }),
    }
}
