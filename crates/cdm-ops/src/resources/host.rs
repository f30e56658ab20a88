//! Host registration reconciler

use super::current_of;
use crate::comparison::Comparison;
use crate::reconciler::{ReconciliationOutcome, reconcile_state};
use crate::state::DesiredState;
use cdm_client::{CdmClientTrait, Host, RegisterHostRequest};
use cdm_specs::HostSpec;

/// Register a host unless it is already known to the cluster
pub async fn ensure_host(client: &dyn CdmClientTrait, spec: &HostSpec) -> ReconciliationOutcome<Host> {
    let resource = format!("host {}", spec.hostname);
    try_outcome!(&resource, spec.validate("host"));

    let request = RegisterHostRequest {
        hostname: spec.hostname.clone(),
        has_agent: spec.has_agent,
    };
    let desired = DesiredState::new().with("hostname", spec.hostname.as_str());
    // NotFound from the lookup means the host is absent
    let fetch = async { current_of(&client.get_host_by_name(&spec.hostname).await?) };

    reconcile_state(
        &resource,
        &desired,
        fetch,
        &Comparison::fields(["hostname"]),
        client.register_host(&request),
    )
    .await
}
