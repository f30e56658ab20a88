//! Unit tests for the manifest applier

#[cfg(test)]
mod tests {
    use crate::applier::Applier;
    use crate::error::ApplyError;
    use cdm_client::{Assignment, CdmClientTrait, MockCdmClient, TaskStatus, VirtualMachine};
    use cdm_ops::MonitorConfig;
    use cdm_specs::Manifest;
    use std::sync::Arc;
    use std::time::Duration;

    const MANIFEST: &str = r#"
cluster:
  timezone: America/Chicago
  ntpServers: [1.pool.ntp.org, 0.pool.ntp.org]
  syslog:
    - hostname: logs.lab
      protocol: TCP
hosts:
  - hostname: db01.lab
filesetTemplates:
  - name: etc
    includes: [/etc]
filesets:
  - hostname: db01.lab
    template: etc
    sla: Silver
slaAssignments:
  - vm: web01
    sla: Gold
  - vm: web02
    sla: UNPROTECTED
archivalLocations:
  - name: aws-archive
    bucket: cdm-archive
    region: us-east-1
    accessKey: AKIAEXAMPLE
    secretKey: secret
"#;

    fn mock() -> MockCdmClient {
        let client = MockCdmClient::new("http://mock/api");
        client.set_timezone("America/Los_Angeles");
        client.add_sla_domain("sla-gold", "Gold");
        client.add_sla_domain("sla-silver", "Silver");
        for (id, name) in [("vm-1", "web01"), ("vm-2", "web02")] {
            client.add_vm(VirtualMachine {
                id: id.to_string(),
                name: name.to_string(),
                configured_sla_domain_id: Assignment::Inherited,
                effective_sla_domain_name: None,
            });
        }
        client
    }

    fn applier(client: &MockCdmClient) -> Applier {
        let shared: Arc<dyn CdmClientTrait> = Arc::new(client.clone());
        Applier::new(
            shared,
            MonitorConfig {
                poll_interval: Duration::from_millis(1),
                max_workers: 2,
                timeout: Some(Duration::from_secs(5)),
            },
        )
    }

    #[tokio::test]
    async fn test_apply_converges_then_changes_nothing() {
        let client = mock();
        let manifest = Manifest::from_yaml_str(MANIFEST).unwrap();

        let first = applier(&client).apply(&manifest).await.unwrap();
        assert!(first.failures.is_empty(), "unexpected failures: {:?}", first.failures);
        assert_eq!(first.applied, 10);
        assert_eq!(first.unchanged, 0);
        assert_eq!(first.jobs.len(), 1);
        assert!(first.is_success());
        assert_eq!(client.vm_assignment("vm-1"), Some(Assignment::Explicit("sla-gold".to_string())));
        assert_eq!(client.vm_assignment("vm-2"), Some(Assignment::Unprotected));

        let mutations = client.mutations().len();
        let second = applier(&client).apply(&manifest).await.unwrap();
        assert_eq!(second.applied, 0);
        assert_eq!(second.unchanged, 10);
        assert!(second.jobs.is_empty());
        assert_eq!(client.mutations().len(), mutations);
    }

    #[tokio::test]
    async fn test_failed_entry_does_not_stop_the_run() {
        let client = mock();
        let manifest = Manifest::from_yaml_str(
            r#"
hosts:
  - hostname: db01.lab
slaAssignments:
  - vm: ghost
    sla: Gold
  - vm: web01
    sla: Gold
"#,
        )
        .unwrap();

        let report = applier(&client).apply(&manifest).await.unwrap();
        assert_eq!(report.applied, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "SLA assignment of VM ghost");
        assert!(matches!(
            report.ensure_complete(),
            Err(ApplyError::Incomplete { failed: 1, jobs_failed: 0 })
        ));
    }

    #[tokio::test]
    async fn test_fileset_sla_skipped_when_fileset_fails() {
        let client = mock();
        let manifest = Manifest::from_yaml_str(
            r#"
filesets:
  - hostname: missing.lab
    template: etc
    sla: Silver
"#,
        )
        .unwrap();

        let report = applier(&client).apply(&manifest).await.unwrap();
        assert_eq!(report.failures.len(), 1);
        assert!(client.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_manifest_is_rejected_before_any_call() {
        let client = mock();
        let mut manifest = Manifest::default();
        manifest.cluster.timezone = Some("Mars/Olympus".to_string());

        let err = applier(&client).apply(&manifest).await.unwrap_err();
        assert!(matches!(err, ApplyError::Spec(_)));
        assert!(client.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_failed_jobs_are_reported() {
        let client = mock();
        client.set_default_job_script(vec![TaskStatus::Running, TaskStatus::Failed]);
        let manifest = Manifest::from_yaml_str(
            r#"
snapshots:
  - vm: web01
  - vm: web02
"#,
        )
        .unwrap();

        let report = applier(&client).apply(&manifest).await.unwrap();
        assert_eq!(report.applied, 2);
        assert_eq!(report.jobs.len(), 2);
        assert_eq!(report.job_summary().failed, 2);
        assert!(matches!(
            report.ensure_complete(),
            Err(ApplyError::Incomplete { failed: 0, jobs_failed: 2 })
        ));
    }

    #[tokio::test]
    async fn test_jobs_left_pending_when_not_waiting() {
        let client = mock();
        let manifest = Manifest::from_yaml_str("snapshots:\n  - vm: web01\n").unwrap();

        let report = applier(&client).with_wait_for_jobs(false).apply(&manifest).await.unwrap();
        assert_eq!(report.pending.len(), 1);
        assert!(report.jobs.is_empty());
        assert_eq!(client.job_polls(report.pending[0].as_str()), 0);
    }
}
