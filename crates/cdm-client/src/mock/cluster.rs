//! Cluster settings for MockCdmClient
//!
//! Handles timezone, NTP and syslog export targets

use super::MockCdmClient;
use crate::error::CdmError;
use crate::models::*;

pub async fn cluster_timezone(client: &MockCdmClient) -> Result<String, CdmError> {
    client.check("cluster_timezone")?;
    Ok(client.timezone.lock().unwrap().clone())
}

pub async fn set_cluster_timezone(client: &MockCdmClient, timezone: &str) -> Result<ClusterInfo, CdmError> {
    client.check("set_cluster_timezone")?;
    client.record("set_cluster_timezone", timezone);
    *client.timezone.lock().unwrap() = timezone.to_string();
    Ok(ClusterInfo {
        id: "mock-cluster".to_string(),
        version: Some("5.0.1".to_string()),
        name: Some("mock".to_string()),
        timezone: TimezoneSetting {
            timezone: timezone.to_string(),
        },
    })
}

pub async fn ntp_servers(client: &MockCdmClient) -> Result<Vec<String>, CdmError> {
    client.check("ntp_servers")?;
    Ok(client.ntp_servers.lock().unwrap().clone())
}

pub async fn set_ntp_servers(client: &MockCdmClient, servers: &[String]) -> Result<(), CdmError> {
    client.check("set_ntp_servers")?;
    client.record("set_ntp_servers", &servers.join(","));
    *client.ntp_servers.lock().unwrap() = servers.to_vec();
    Ok(())
}

pub async fn syslog_servers(client: &MockCdmClient) -> Result<Vec<SyslogServer>, CdmError> {
    client.check("syslog_servers")?;
    Ok(client.syslog_servers.lock().unwrap().clone())
}

pub async fn add_syslog_server(client: &MockCdmClient, request: &SyslogServerRequest) -> Result<SyslogServer, CdmError> {
    client.check("add_syslog_server")?;
    client.record("add_syslog_server", &request.hostname);
    let server = SyslogServer {
        id: Some(client.next_id().to_string()),
        hostname: request.hostname.clone(),
        port: request.port,
        protocol: request.protocol.clone(),
    };
    client.syslog_servers.lock().unwrap().push(server.clone());
    Ok(server)
}
