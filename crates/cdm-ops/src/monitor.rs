//! Task monitor
//!
//! Polls long-running appliance jobs until each reaches a terminal status.
//!
//! Each handle gets its own worker on a `JoinSet`; a semaphore caps how many
//! workers poll at once, independent of how many handles are passed in.
//! Workers never share state: each returns its report, and the coordinator
//! files it into the slot matching the handle's input position.

use crate::error::MonitorError;
use async_trait::async_trait;
use cdm_client::{CdmClientTrait, CdmError, TaskHandle, TaskStatus, TerminalStatus};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Default delay between two polls of the same job
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(20);

/// Default number of jobs polled concurrently
pub const DEFAULT_MAX_WORKERS: usize = 8;

/// Where job statuses come from
#[async_trait]
pub trait TaskStatusSource: Send + Sync {
    async fn status(&self, handle: &TaskHandle) -> Result<TaskStatus, CdmError>;
}

/// Status source backed by the appliance's job status endpoint
#[derive(Clone)]
pub struct JobStatusSource {
    client: Arc<dyn CdmClientTrait>,
}

impl JobStatusSource {
    /// Poll job status through `client`
    pub fn new(client: Arc<dyn CdmClientTrait>) -> Self {
        Self { client }
    }
}

impl std::fmt::Debug for JobStatusSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobStatusSource")
            .field("base_url", &self.client.base_url())
            .finish()
    }
}

#[async_trait]
impl TaskStatusSource for JobStatusSource {
    async fn status(&self, handle: &TaskHandle) -> Result<TaskStatus, CdmError> {
        let request = self.client.job_status(handle).await?;
        if let Some(err) = &request.error {
            debug!("Job {} reported error: {}", handle, err.message);
        }
        Ok(request.task_status())
    }
}

/// Monitor settings
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Delay between two polls of the same handle
    pub poll_interval: Duration,
    /// Maximum number of handles polled concurrently
    pub max_workers: usize,
    /// Give up on a handle after this long
    pub timeout: Option<Duration>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_workers: DEFAULT_MAX_WORKERS,
            timeout: None,
        }
    }
}

/// Terminal outcome of one monitored handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
    /// Handle that was monitored
    pub handle: TaskHandle,
    /// First terminal status observed
    pub status: TerminalStatus,
    /// Wall-clock time since the handle's worker started polling
    pub elapsed: Duration,
    /// Number of status calls made
    pub polls: u32,
}

impl TaskResult {
    /// Whether the job ended `Succeeded`
    pub fn succeeded(&self) -> bool {
        self.status == TerminalStatus::Succeeded
    }
}

/// Per-handle entry returned by [`TaskMonitor::monitor`]
pub type TaskReport = Result<TaskResult, MonitorError>;

/// Counts over a batch of reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorSummary {
    /// Jobs that ended `Succeeded`
    pub succeeded: usize,
    /// Jobs that ended `Failed`
    pub failed: usize,
    /// Handles that ended with a monitor error
    pub errored: usize,
}

impl MonitorSummary {
    /// Count the outcomes in `reports`
    pub fn from_reports(reports: &[TaskReport]) -> Self {
        reports.iter().fold(Self::default(), |mut summary, report| {
            match report {
                Ok(result) if result.succeeded() => summary.succeeded += 1,
                Ok(_) => summary.failed += 1,
                Err(_) => summary.errored += 1,
            }
            summary
        })
    }

    /// Whether no job failed or errored
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }
}

/// Polls task handles to completion
#[derive(Clone)]
pub struct TaskMonitor {
    source: Arc<dyn TaskStatusSource>,
    config: MonitorConfig,
    cancel: CancellationToken,
}

impl std::fmt::Debug for TaskMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskMonitor")
            .field("config", &self.config)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

impl TaskMonitor {
    /// Create a monitor polling `source` with `config`
    pub fn new(source: Arc<dyn TaskStatusSource>, config: MonitorConfig) -> Self {
        Self {
            source,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop all workers when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Current settings
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Poll every handle until it reaches a terminal status
    ///
    /// Returns one report per handle, in input order. A failure for one
    /// handle (status error, timeout, cancellation) is confined to that
    /// handle's report; the others keep polling.
    pub async fn monitor(&self, handles: Vec<TaskHandle>) -> Result<Vec<TaskReport>, MonitorError> {
        if handles.is_empty() {
            return Err(MonitorError::NoHandles);
        }

        let workers = self.config.max_workers.max(1);
        info!("Monitoring {} job(s) with up to {} concurrent worker(s)", handles.len(), workers);

        let semaphore = Arc::new(Semaphore::new(workers));
        let mut set = JoinSet::new();
        for (index, handle) in handles.iter().cloned().enumerate() {
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            let config = self.config.clone();
            let cancel = self.cancel.clone();

            set.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    let reason = "worker pool closed".to_string();
                    return (index, Err(MonitorError::Worker { handle, reason }));
                };
                let report = poll_until_terminal(source.as_ref(), &handle, &config, &cancel).await;
                (index, report)
            });
        }

        let mut slots: Vec<Option<TaskReport>> = handles.iter().map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, report)) => slots[index] = Some(report),
                Err(e) => error!("Task monitor worker did not complete: {}", e),
            }
        }

        let reports: Vec<TaskReport> = slots
            .into_iter()
            .zip(handles)
            .map(|(slot, handle)| {
                slot.unwrap_or_else(|| {
                    Err(MonitorError::Worker {
                        handle,
                        reason: "worker panicked or was aborted".to_string(),
                    })
                })
            })
            .collect();

        let summary = MonitorSummary::from_reports(&reports);
        info!(
            "Job monitoring finished: {} succeeded, {} failed, {} errored",
            summary.succeeded, summary.failed, summary.errored
        );
        Ok(reports)
    }

    /// Poll a single handle until it reaches a terminal status
    pub async fn monitor_one(&self, handle: &TaskHandle) -> Result<TaskResult, MonitorError> {
        poll_until_terminal(self.source.as_ref(), handle, &self.config, &self.cancel).await
    }
}

async fn poll_until_terminal(
    source: &dyn TaskStatusSource,
    handle: &TaskHandle,
    config: &MonitorConfig,
    cancel: &CancellationToken,
) -> TaskReport {
    let polling = poll_loop(source, handle, config.poll_interval);
    let bounded = async {
        match config.timeout {
            Some(limit) => match tokio::time::timeout(limit, polling).await {
                Ok(report) => report,
                Err(_) => {
                    warn!("Job {} did not finish within {:?}", handle, limit);
                    Err(MonitorError::TimedOut {
                        handle: handle.clone(),
                        after: limit,
                    })
                }
            },
            None => polling.await,
        }
    };

    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            warn!("Monitoring of job {} cancelled", handle);
            Err(MonitorError::Cancelled { handle: handle.clone() })
        }
        report = bounded => report,
    }
}

async fn poll_loop(source: &dyn TaskStatusSource, handle: &TaskHandle, poll_interval: Duration) -> TaskReport {
    let started = Instant::now();
    let mut polls = 0u32;
    loop {
        let status = match source.status(handle).await {
            Ok(status) => status,
            Err(e) => {
                error!("Failed to get status of job {}: {}", handle, e);
                return Err(MonitorError::Status {
                    handle: handle.clone(),
                    source: e,
                });
            }
        };
        polls += 1;

        if let Some(terminal) = status.terminal() {
            let elapsed = started.elapsed();
            match terminal {
                TerminalStatus::Succeeded => info!("Job {} succeeded after {:?}", handle, elapsed),
                TerminalStatus::Failed => warn!("Job {} failed after {:?}", handle, elapsed),
            }
            return Ok(TaskResult {
                handle: handle.clone(),
                status: terminal,
                elapsed,
                polls,
            });
        }

        debug!("Job {} is {} (poll {}), next check in {:?}", handle, status, polls, poll_interval);
        tokio::time::sleep(poll_interval).await;
    }
}
