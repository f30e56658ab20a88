//! Transport tests against a local HTTP stub
//!
//! These run without an appliance: wiremock plays the CDM REST API and the
//! cloud GraphQL endpoint.

use cdm_client::{
    Assignment, CdmClient, CdmClientTrait, CdmError, CloudClient, Credentials, ObjectType, TaskHandle,
    TaskStatus,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn token_client(server: &MockServer) -> CdmClient {
    CdmClient::new(&server.uri(), Credentials::Token("test-token".to_string())).unwrap()
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/cluster/me"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cluster-1",
            "version": "5.0.1",
            "timezone": {"timezone": "America/Chicago"}
        })))
        .mount(&server)
        .await;

    let client = token_client(&server);
    client.validate_credentials().await.unwrap();
    assert_eq!(client.cluster_timezone().await.unwrap(), "America/Chicago");
}

#[tokio::test]
async fn test_basic_auth_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/internal/cluster/me/ntp_server"))
        .and(header("Authorization", "Basic YWRtaW46c2VjcmV0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hasMore": false,
            "data": ["pool.ntp.org"],
            "total": 1
        })))
        .mount(&server)
        .await;

    let client = CdmClient::new(
        &server.uri(),
        Credentials::Basic {
            username: "admin".to_string(),
            password: "secret".to_string(),
        },
    )
    .unwrap();
    assert_eq!(client.ntp_servers().await.unwrap(), vec!["pool.ntp.org".to_string()]);
}

#[tokio::test]
async fn test_status_codes_map_to_error_variants() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/vmware/vm/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "No VM"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/vmware/vm/forbidden"))
        .respond_with(ResponseTemplate::new(403).set_body_string("denied"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/vmware/vm/broken"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"errorType": "internal", "message": "boom"})),
        )
        .mount(&server)
        .await;

    let client = token_client(&server);
    assert!(client.vm_sla_assignment("missing").await.unwrap_err().is_not_found());
    assert!(matches!(
        client.vm_sla_assignment("forbidden").await.unwrap_err(),
        CdmError::Authentication(_)
    ));
    match client.vm_sla_assignment("broken").await.unwrap_err() {
        CdmError::Api { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("boom"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_resolve_walks_every_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/vmware/vm"))
        .and(query_param("name", "web01"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hasMore": true,
            "data": [
                {"id": "VirtualMachine:::1", "name": "web01-clone"},
                {"id": "VirtualMachine:::2", "name": "web01-old"}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/vmware/vm"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hasMore": false,
            "data": [{"id": "VirtualMachine:::3", "name": "web01"}]
        })))
        .mount(&server)
        .await;

    let client = token_client(&server);
    let id = client
        .resolve(ObjectType::VmwareVm, "web01", &[("primary_cluster_id", "local")])
        .await
        .unwrap();
    assert_eq!(id, "VirtualMachine:::3");
}

#[tokio::test]
async fn test_archival_resolve_and_lookup_share_one_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/internal/archive/object_store"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hasMore": false,
            "data": [
                {"id": "ArchivalLocation:::1", "definition": {"name": "aws-archive-old", "bucket": "old", "accessKey": "AKIA1"}},
                {"id": "ArchivalLocation:::2", "definition": {"name": "aws-archive", "bucket": "cdm-archive", "accessKey": "AKIA2"}}
            ]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = token_client(&server);
    let id = client.resolve(ObjectType::ArchivalLocation, "aws-archive", &[]).await.unwrap();
    let location = client.get_archival_location("aws-archive").await.unwrap();
    assert_eq!(id, "ArchivalLocation:::2");
    assert_eq!(location.id, id);
}

#[tokio::test]
async fn test_assignment_is_patched_with_sentinel() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/vmware/vm/vm-1"))
        .and(body_json(json!({"configuredSlaDomainId": "UNPROTECTED"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "vm-1",
            "name": "web01",
            "configuredSlaDomainId": "UNPROTECTED"
        })))
        .mount(&server)
        .await;

    let client = token_client(&server);
    let vm = client.assign_vm_sla("vm-1", &Assignment::Unprotected).await.unwrap();
    assert_eq!(vm.configured_sla_domain_id, Assignment::Unprotected);
}

#[tokio::test]
async fn test_job_status_follows_self_link() {
    let server = MockServer::start().await;
    let link = format!("{}/api/v1/vmware/vm/request/SNAP_1", server.uri());
    Mock::given(method("POST"))
        .and(path("/api/v1/vmware/vm/vm-1/snapshot"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "id": "SNAP_1",
            "status": "QUEUED",
            "links": [{"href": link, "rel": "self"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/vmware/vm/request/SNAP_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "SNAP_1",
            "status": "SUCCEEDED",
            "progress": 100.0
        })))
        .mount(&server)
        .await;

    let client = token_client(&server);
    let job = client.vm_on_demand_snapshot("vm-1", None).await.unwrap();
    assert_eq!(job.task_handle(), TaskHandle::new(link));
    let status = client.job_status(&job.task_handle()).await.unwrap();
    assert_eq!(status.task_status(), TaskStatus::Succeeded);
}

#[tokio::test]
async fn test_empty_success_body_decodes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/internal/cluster/me/ntp_server"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = token_client(&server);
    client
        .set_ntp_servers(&["time.example.com".to_string()])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_graphql_sla_domain_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/graphql"))
        .and(header("Authorization", "Bearer cloud-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"slaDomains": {"edges": [
                {"node": {"id": "sla-gold", "name": "Gold"}},
                {"node": {"id": "sla-gold-eu", "name": "Gold-EU"}}
            ]}}
        })))
        .mount(&server)
        .await;

    let cloud = CloudClient::new(&server.uri(), "cloud-token".to_string()).unwrap();
    assert_eq!(cloud.sla_domain_id("Gold").await.unwrap(), "sla-gold");
}

#[tokio::test]
async fn test_graphql_errors_surface() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{"message": "Unauthorized"}]
        })))
        .mount(&server)
        .await;

    let cloud = CloudClient::new(&server.uri(), "cloud-token".to_string()).unwrap();
    assert!(matches!(cloud.sla_domain_id("Gold").await, Err(CdmError::GraphQl(_))));
}

#[tokio::test]
async fn test_cloud_login_exchanges_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/client_token"))
        .and(body_json(json!({"client_id": "svc", "client_secret": "s3cret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "issued"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/graphql"))
        .and(header("Authorization", "Bearer issued"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"ok": true}})))
        .mount(&server)
        .await;

    let cloud = CloudClient::login(&server.uri(), "svc", "s3cret").await.unwrap();
    let data: serde_json::Value = cloud.execute("query { ok }", json!({})).await.unwrap();
    assert_eq!(data["ok"], true);
}
