//! On-demand snapshot trigger

use crate::reconciler::{ReconciliationOutcome, reconcile_new};
use cdm_client::{CdmClientTrait, CdmError, ObjectType, TaskHandle};
use cdm_specs::SnapshotSpec;

/// Start an on-demand snapshot of a VM and return the job handle
///
/// Every call starts a new job; there is no current state to compare.
pub async fn take_on_demand_snapshot(client: &dyn CdmClientTrait, spec: &SnapshotSpec) -> ReconciliationOutcome<TaskHandle> {
    let resource = format!("on-demand snapshot of VM {}", spec.vm);
    try_outcome!(&resource, spec.validate("snapshot"));

    let local = [("primary_cluster_id", "local")];
    let vm_id = try_outcome!(&resource, client.resolve(ObjectType::VmwareVm, &spec.vm, &local).await);
    let sla_id = match &spec.sla {
        Some(name) => Some(try_outcome!(&resource, client.resolve(ObjectType::SlaDomain, name, &local).await)),
        None => None,
    };

    let apply = async {
        let job = client.vm_on_demand_snapshot(&vm_id, sla_id.as_deref()).await?;
        Ok::<_, CdmError>(job.task_handle())
    };
    reconcile_new(&resource, spec, apply).await
}
