//! Manifest applier
//!
//! Reconciles every manifest entry in dependency order (cluster settings,
//! hosts, fileset templates, filesets, SLA assignments, archival locations,
//! snapshots). A failed entry is recorded and the run continues; dependants
//! of a failed fileset are skipped. Jobs started along the way are handed to
//! the task monitor at the end.

use crate::error::ApplyError;
use cdm_client::{CdmClientTrait, TaskHandle};
use cdm_ops::resources::{
    ensure_fileset, ensure_fileset_sla, ensure_fileset_template, ensure_host, ensure_ntp_servers,
    ensure_s3_archival_location, ensure_syslog_server, ensure_timezone, ensure_vm_sla, take_on_demand_snapshot,
};
use cdm_ops::{JobStatusSource, MonitorConfig, MonitorSummary, ReconcileError, ReconciliationOutcome, TaskMonitor, TaskReport};
use cdm_specs::Manifest;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// What one run did
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Resources that already matched
    pub unchanged: usize,
    /// Resources that were created or updated
    pub applied: usize,
    /// Resources that failed, with the reason
    pub failures: Vec<(String, ReconcileError)>,
    /// Monitored jobs, in the order they were started
    pub jobs: Vec<TaskReport>,
    /// Jobs started but not monitored
    pub pending: Vec<TaskHandle>,
}

impl ApplyReport {
    fn record<R>(&mut self, resource: impl Into<String>, outcome: ReconciliationOutcome<R>) -> Option<R> {
        match outcome {
            ReconciliationOutcome::NoChangeRequired => {
                self.unchanged += 1;
                None
            }
            ReconciliationOutcome::Applied(result) => {
                self.applied += 1;
                Some(result)
            }
            ReconciliationOutcome::Failed(err) => {
                self.failures.push((resource.into(), err));
                None
            }
        }
    }

    pub fn job_summary(&self) -> MonitorSummary {
        MonitorSummary::from_reports(&self.jobs)
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.job_summary().all_succeeded()
    }

    pub fn log_summary(&self) {
        let jobs = self.job_summary();
        info!(
            "Apply finished: {} applied, {} unchanged, {} failed; jobs: {} succeeded, {} failed, {} errored, {} not monitored",
            self.applied,
            self.unchanged,
            self.failures.len(),
            jobs.succeeded,
            jobs.failed,
            jobs.errored,
            self.pending.len()
        );
        for (resource, err) in &self.failures {
            error!("  {}: {}", resource, err);
        }
        for report in &self.jobs {
            match report {
                Ok(result) if !result.succeeded() => warn!("  job {} ended {:?}", result.handle, result.status),
                Err(e) => warn!("  {}", e),
                Ok(_) => {}
            }
        }
    }

    /// `Err(Incomplete)` unless every resource and job converged
    pub fn ensure_complete(&self) -> Result<(), ApplyError> {
        if self.is_success() {
            return Ok(());
        }
        let jobs = self.job_summary();
        Err(ApplyError::Incomplete {
            failed: self.failures.len(),
            jobs_failed: jobs.failed + jobs.errored,
        })
    }
}

pub struct Applier {
    client: Arc<dyn CdmClientTrait>,
    monitor_config: MonitorConfig,
    wait_for_jobs: bool,
    cancel: CancellationToken,
}

impl std::fmt::Debug for Applier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Applier")
            .field("monitor_config", &self.monitor_config)
            .field("wait_for_jobs", &self.wait_for_jobs)
            .finish()
    }
}

impl Applier {
    pub fn new(client: Arc<dyn CdmClientTrait>, monitor_config: MonitorConfig) -> Self {
        Self {
            client,
            monitor_config,
            wait_for_jobs: true,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_wait_for_jobs(mut self, wait: bool) -> Self {
        self.wait_for_jobs = wait;
        self
    }

    /// Cancel job monitoring when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Reconcile the whole manifest
    ///
    /// Validation runs first; an invalid manifest is rejected before any
    /// remote call.
    pub async fn apply(&self, manifest: &Manifest) -> Result<ApplyReport, ApplyError> {
        manifest.validate()?;
        if manifest.is_empty() {
            warn!("Manifest declares no resources, nothing to do");
            return Ok(ApplyReport::default());
        }

        let client = self.client.as_ref();
        let mut report = ApplyReport::default();
        let mut handles = Vec::new();

        if let Some(timezone) = &manifest.cluster.timezone {
            report.record("cluster timezone", ensure_timezone(client, timezone).await);
        }
        if let Some(servers) = &manifest.cluster.ntp_servers {
            report.record("cluster NTP servers", ensure_ntp_servers(client, servers).await);
        }
        for syslog in &manifest.cluster.syslog {
            let resource = format!("syslog target {}", syslog.hostname);
            report.record(resource, ensure_syslog_server(client, syslog).await);
        }

        for host in &manifest.hosts {
            report.record(format!("host {}", host.hostname), ensure_host(client, host).await);
        }
        for template in &manifest.fileset_templates {
            let resource = format!("fileset template {}", template.name);
            report.record(resource, ensure_fileset_template(client, template).await);
        }
        for fileset in &manifest.filesets {
            let resource = format!("fileset {} on {}", fileset.template, fileset.hostname);
            let outcome = ensure_fileset(client, fileset).await;
            let created = !outcome.is_failed();
            report.record(resource.clone(), outcome);

            match (&fileset.sla, created) {
                (Some(sla), true) => {
                    let outcome = ensure_fileset_sla(client, fileset, sla).await;
                    report.record(format!("SLA assignment of {}", resource), outcome);
                }
                (Some(_), false) => warn!("Skipping SLA assignment of {}: fileset failed", resource),
                (None, _) => {}
            }
        }

        for assignment in &manifest.sla_assignments {
            let resource = format!("SLA assignment of VM {}", assignment.vm);
            report.record(resource, ensure_vm_sla(client, assignment).await);
        }

        for location in &manifest.archival_locations {
            let resource = format!("archival location {}", location.name);
            if let Some(handle) = report.record(resource, ensure_s3_archival_location(client, location).await) {
                handles.push(handle);
            }
        }
        for snapshot in &manifest.snapshots {
            let resource = format!("snapshot of VM {}", snapshot.vm);
            if let Some(handle) = report.record(resource, take_on_demand_snapshot(client, snapshot).await) {
                handles.push(handle);
            }
        }

        if handles.is_empty() {
            return Ok(report);
        }
        if !self.wait_for_jobs {
            info!("Not waiting for {} started job(s)", handles.len());
            report.pending = handles;
            return Ok(report);
        }

        let source = Arc::new(JobStatusSource::new(Arc::clone(&self.client)));
        let monitor = TaskMonitor::new(source, self.monitor_config.clone()).with_cancellation(self.cancel.clone());
        report.jobs = monitor.monitor(handles).await?;
        Ok(report)
    }
}
