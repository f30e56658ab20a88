//! Cluster settings reconcilers

use super::current_of;
use crate::comparison::Comparison;
use crate::reconciler::{ReconciliationOutcome, reconcile_state};
use crate::state::{CurrentState, DesiredState};
use cdm_client::{CdmClientTrait, CdmError, ClusterInfo, SyslogServer, SyslogServerRequest};
use cdm_specs::{SyslogSpec, normalize_servers, validation};

/// Set the cluster timezone if it differs
pub async fn ensure_timezone(client: &dyn CdmClientTrait, timezone: &str) -> ReconciliationOutcome<ClusterInfo> {
    let resource = "cluster timezone";
    try_outcome!(resource, validation::timezone("cluster.timezone", timezone));

    let desired = DesiredState::new().with("timezone", timezone);
    let fetch = async {
        let current = client.cluster_timezone().await?;
        Ok::<_, CdmError>(Some(CurrentState::new().with("timezone", current)))
    };

    reconcile_state(resource, &desired, fetch, &Comparison::Exact, client.set_cluster_timezone(timezone)).await
}

/// Set the cluster NTP servers if the set differs (order is ignored)
pub async fn ensure_ntp_servers(client: &dyn CdmClientTrait, servers: &[String]) -> ReconciliationOutcome<()> {
    let resource = "cluster NTP servers";
    if servers.is_empty() {
        let err = cdm_specs::SpecError::validation("cluster.ntpServers", "must list at least one server");
        return ReconciliationOutcome::failed(resource, err);
    }
    for (i, server) in servers.iter().enumerate() {
        try_outcome!(resource, validation::hostname(&format!("cluster.ntpServers[{}]", i), server));
    }

    let wanted = normalize_servers(servers);
    let desired = DesiredState::new().with("servers", wanted.clone());
    let fetch = async {
        let current = normalize_servers(&client.ntp_servers().await?);
        Ok::<_, CdmError>(Some(CurrentState::new().with("servers", current)))
    };

    reconcile_state(resource, &desired, fetch, &Comparison::Exact, client.set_ntp_servers(&wanted)).await
}

/// Add a syslog export target unless one with the same hostname, port and
/// protocol exists
///
/// Targets are matched on all three fields. A target for the same host on
/// another port or protocol is left in place and a new one is added.
pub async fn ensure_syslog_server(client: &dyn CdmClientTrait, spec: &SyslogSpec) -> ReconciliationOutcome<SyslogServer> {
    let resource = format!("syslog target {}", spec.hostname);
    try_outcome!(&resource, spec.validate("syslog"));

    let request = SyslogServerRequest {
        hostname: spec.hostname.clone(),
        port: spec.port,
        protocol: spec.protocol.as_str().to_string(),
    };
    let desired = try_outcome!(&resource, DesiredState::from_serialize(&request));
    let fetch = async {
        let servers = client.syslog_servers().await?;
        let existing = servers
            .iter()
            .find(|s| s.hostname == request.hostname && s.port == request.port && s.protocol == request.protocol);
        match existing {
            Some(server) => current_of(server),
            None => Ok(None),
        }
    };

    reconcile_state(
        &resource,
        &desired,
        fetch,
        &Comparison::fields(["hostname", "port", "protocol"]),
        client.add_syslog_server(&request),
    )
    .await
}
