//! Integration tests for the CDM client
//!
//! These tests require a reachable CDM appliance.
//! Set CDM_NODE and CDM_API_TOKEN environment variables to run.

use cdm_client::{CdmClient, CdmClientTrait, Credentials, ObjectType};

fn live_client() -> CdmClient {
    let node = std::env::var("CDM_NODE").expect("CDM_NODE environment variable must be set");
    let token = std::env::var("CDM_API_TOKEN").expect("CDM_API_TOKEN environment variable must be set");

    CdmClient::new(&node, Credentials::Token(token)).expect("Failed to create client")
}

#[tokio::test]
#[ignore] // Requires a reachable appliance
async fn test_client_creation() {
    let client = live_client();

    // Test basic API connectivity
    let result = client.validate_credentials().await;
    assert!(result.is_ok(), "Failed to validate credentials: {:?}", result);
}

#[tokio::test]
#[ignore]
async fn test_cluster_settings() {
    let client = live_client();

    let timezone = client.cluster_timezone().await.expect("Failed to read timezone");
    let ntp = client.ntp_servers().await.expect("Failed to read NTP servers");
    let syslog = client.syslog_servers().await.expect("Failed to read syslog targets");

    println!("Timezone {}, {} NTP servers, {} syslog targets", timezone, ntp.len(), syslog.len());
}

#[tokio::test]
#[ignore]
async fn test_resolve_unknown_vm_is_not_found() {
    let client = live_client();

    let err = client
        .resolve(ObjectType::VmwareVm, "no-such-vm-cdm-client-test", &[("primary_cluster_id", "local")])
        .await
        .expect_err("Unexpectedly resolved a VM");
    assert!(err.is_not_found());
}
