//! SLA Domain assignment reconcilers
//!
//! Assignments are compared exactly on `configuredSlaDomainId`, so the
//! `UNPROTECTED` and `INHERIT` sentinels are treated like any SLA id.

use super::fileset::fileset_parents;
use crate::comparison::Comparison;
use crate::reconciler::{ReconciliationOutcome, reconcile_state};
use crate::state::{CurrentState, DesiredState};
use cdm_client::{Assignment, CdmClientTrait, CdmError, Fileset, ObjectType, VirtualMachine};
use cdm_specs::{FilesetSpec, SlaAssignmentSpec, SlaRef};

const LOCAL_CLUSTER: (&str, &str) = ("primary_cluster_id", "local");

/// Turn a manifest SLA reference into an assignment, resolving names to ids
pub async fn resolve_assignment(client: &dyn CdmClientTrait, sla: &SlaRef) -> Result<Assignment, CdmError> {
    match sla {
        SlaRef::Unprotected => Ok(Assignment::Unprotected),
        SlaRef::Inherit => Ok(Assignment::Inherited),
        SlaRef::Named(name) => client
            .resolve(ObjectType::SlaDomain, name, &[LOCAL_CLUSTER])
            .await
            .map(Assignment::Explicit),
    }
}

fn assignment_state(assignment: &Assignment) -> DesiredState {
    DesiredState::new().with("configuredSlaDomainId", assignment.as_wire())
}

fn current_assignment(assignment: &Assignment) -> Option<CurrentState> {
    Some(CurrentState::new().with("configuredSlaDomainId", assignment.as_wire()))
}

/// Assign a VM to an SLA Domain unless it already is
pub async fn ensure_vm_sla(client: &dyn CdmClientTrait, spec: &SlaAssignmentSpec) -> ReconciliationOutcome<VirtualMachine> {
    let resource = format!("SLA assignment of VM {}", spec.vm);
    try_outcome!(&resource, spec.validate("slaAssignment"));

    let vm_id = try_outcome!(&resource, client.resolve(ObjectType::VmwareVm, &spec.vm, &[LOCAL_CLUSTER]).await);
    let assignment = try_outcome!(&resource, resolve_assignment(client, &spec.sla).await);

    let desired = assignment_state(&assignment);
    let fetch = async { client.vm_sla_assignment(&vm_id).await.map(|a| current_assignment(&a)) };

    reconcile_state(
        &resource,
        &desired,
        fetch,
        &Comparison::Exact,
        client.assign_vm_sla(&vm_id, &assignment),
    )
    .await
}

/// Assign a fileset to an SLA Domain unless it already is
pub async fn ensure_fileset_sla(
    client: &dyn CdmClientTrait,
    spec: &FilesetSpec,
    sla: &SlaRef,
) -> ReconciliationOutcome<Fileset> {
    let resource = format!("SLA assignment of fileset {} on {}", spec.template, spec.hostname);
    try_outcome!(&resource, sla.validate("fileset.sla"));

    let (host_id, template_id) = try_outcome!(&resource, fileset_parents(client, spec).await);
    let fileset = try_outcome!(&resource, client.get_fileset(&host_id, &template_id).await);
    let assignment = try_outcome!(&resource, resolve_assignment(client, sla).await);

    let desired = assignment_state(&assignment);
    let fetch = async {
        client
            .fileset_sla_assignment(&fileset.id)
            .await
            .map(|a| current_assignment(&a))
    };

    reconcile_state(
        &resource,
        &desired,
        fetch,
        &Comparison::Exact,
        client.assign_fileset_sla(&fileset.id, &assignment),
    )
    .await
}
