//! Fileset template and fileset reconcilers

use super::{current_of, reject_conflict};
use crate::comparison::Comparison;
use crate::reconciler::{ReconciliationOutcome, reconcile_state};
use crate::state::DesiredState;
use cdm_client::{CdmClientTrait, CdmError, Fileset, FilesetTemplate, FilesetTemplateRequest};
use cdm_specs::{FilesetSpec, FilesetTemplateSpec};

/// Create a fileset template unless one with the same paths exists
///
/// Templates are matched by name and operating system. A template that
/// exists with different paths is not edited in place; the conflict is
/// reported as `Failed` and no create call is made.
pub async fn ensure_fileset_template(
    client: &dyn CdmClientTrait,
    spec: &FilesetTemplateSpec,
) -> ReconciliationOutcome<FilesetTemplate> {
    let resource = format!("fileset template {} ({})", spec.name, spec.operating_system);
    try_outcome!(&resource, spec.validate("filesetTemplate"));

    let request = FilesetTemplateRequest {
        name: spec.name.clone(),
        operating_system_type: spec.operating_system.as_str().to_string(),
        includes: spec.includes.clone(),
        excludes: spec.excludes.clone(),
        exceptions: spec.exceptions.clone(),
    };
    let desired = try_outcome!(&resource, DesiredState::from_serialize(&request));
    let comparison = Comparison::fields(["name", "includes", "excludes", "exceptions"]);
    let fetch = async {
        let template = client
            .get_fileset_template(&spec.name, spec.operating_system.as_str())
            .await?;
        reject_conflict(&resource, &desired, &comparison, current_of(&template)?)
    };

    reconcile_state(
        &resource,
        &desired,
        fetch,
        &comparison,
        client.create_fileset_template(&request),
    )
    .await
}

/// Host and template ids a fileset spec points at
pub(crate) async fn fileset_parents(
    client: &dyn CdmClientTrait,
    spec: &FilesetSpec,
) -> Result<(String, String), CdmError> {
    let host = client.get_host_by_name(&spec.hostname).await?;
    let template = client
        .get_fileset_template(&spec.template, spec.operating_system.as_str())
        .await?;
    Ok((host.id, template.id))
}

/// Apply a fileset template to a host unless it already is
pub async fn ensure_fileset(client: &dyn CdmClientTrait, spec: &FilesetSpec) -> ReconciliationOutcome<Fileset> {
    let resource = format!("fileset {} on {}", spec.template, spec.hostname);
    try_outcome!(&resource, spec.validate("fileset"));
    let (host_id, template_id) = try_outcome!(&resource, fileset_parents(client, spec).await);

    let desired = DesiredState::new()
        .with("hostId", host_id.as_str())
        .with("templateId", template_id.as_str());
    let fetch = async { current_of(&client.get_fileset(&host_id, &template_id).await?) };

    reconcile_state(
        &resource,
        &desired,
        fetch,
        &Comparison::fields(["hostId", "templateId"]),
        client.create_fileset(&host_id, &template_id),
    )
    .await
}
