//! Unit tests for the monitor module

#[cfg(test)]
mod tests {
    use crate::error::MonitorError;
    use crate::monitor::*;
    use async_trait::async_trait;
    use cdm_client::{CdmClientTrait, CdmError, MockCdmClient, TaskHandle, TaskStatus, TerminalStatus};
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    /// Status source replaying a script per handle and tracking concurrency
    #[derive(Default)]
    struct ScriptedSource {
        scripts: Mutex<HashMap<String, VecDeque<Result<TaskStatus, u16>>>>,
        active: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn script(self, handle: &str, steps: Vec<Result<TaskStatus, u16>>) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .insert(handle.to_string(), steps.into_iter().collect());
            self
        }
    }

    #[async_trait]
    impl TaskStatusSource for ScriptedSource {
        async fn status(&self, handle: &TaskHandle) -> Result<TaskStatus, CdmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);

            let mut scripts = self.scripts.lock().unwrap();
            let script = scripts.get_mut(handle.as_str()).expect("unscripted handle");
            let step = if script.len() > 1 {
                script.pop_front().unwrap()
            } else {
                script.front().cloned().unwrap()
            };
            step.map_err(|status| CdmError::Api {
                status,
                message: "status endpoint failed".to_string(),
            })
        }
    }

    fn config(max_workers: usize) -> MonitorConfig {
        MonitorConfig {
            poll_interval: Duration::from_millis(1),
            max_workers,
            timeout: None,
        }
    }

    fn handles(names: &[&str]) -> Vec<TaskHandle> {
        names.iter().map(|n| TaskHandle::new(*n)).collect()
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected() {
        let monitor = TaskMonitor::new(Arc::new(ScriptedSource::default()), config(2));
        assert!(matches!(monitor.monitor(vec![]).await, Err(MonitorError::NoHandles)));
    }

    #[tokio::test]
    async fn test_success_and_failure_in_input_order() {
        let source = ScriptedSource::default()
            .script("job-1", vec![Ok(TaskStatus::Queued), Ok(TaskStatus::Running), Ok(TaskStatus::Succeeded)])
            .script("job-2", vec![Ok(TaskStatus::Queued), Ok(TaskStatus::Running), Ok(TaskStatus::Failed)]);
        let monitor = TaskMonitor::new(Arc::new(source), config(4));

        let reports = monitor.monitor(handles(&["job-1", "job-2"])).await.unwrap();
        assert_eq!(reports.len(), 2);

        let first = reports[0].as_ref().unwrap();
        assert_eq!(first.handle.as_str(), "job-1");
        assert_eq!(first.status, TerminalStatus::Succeeded);
        assert_eq!(first.polls, 3);

        let second = reports[1].as_ref().unwrap();
        assert_eq!(second.handle.as_str(), "job-2");
        assert_eq!(second.status, TerminalStatus::Failed);

        let summary = MonitorSummary::from_reports(&reports);
        assert_eq!(summary, MonitorSummary { succeeded: 1, failed: 1, errored: 0 });
        assert!(!summary.all_succeeded());
    }

    #[tokio::test]
    async fn test_status_error_is_isolated_to_its_handle() {
        let source = ScriptedSource::default()
            .script("ok", vec![Ok(TaskStatus::Running), Ok(TaskStatus::Succeeded)])
            .script("broken", vec![Ok(TaskStatus::Running), Err(500)])
            .script("also-ok", vec![Ok(TaskStatus::Succeeded)]);
        let monitor = TaskMonitor::new(Arc::new(source), config(3));

        let reports = monitor.monitor(handles(&["ok", "broken", "also-ok"])).await.unwrap();
        assert!(reports[0].as_ref().unwrap().succeeded());
        match &reports[1] {
            Err(MonitorError::Status { handle, source }) => {
                assert_eq!(handle.as_str(), "broken");
                assert_eq!(source.status(), Some(500));
            }
            other => panic!("expected status error, got {other:?}"),
        }
        assert!(reports[2].as_ref().unwrap().succeeded());
    }

    #[tokio::test]
    async fn test_every_handle_gets_exactly_one_terminal_result() {
        let names: Vec<String> = (0..12).map(|i| format!("job-{i}")).collect();
        let mut source = ScriptedSource::default();
        for (i, name) in names.iter().enumerate() {
            let last = if i % 3 == 0 { TaskStatus::Failed } else { TaskStatus::Succeeded };
            source = source.script(name, vec![Ok(TaskStatus::Queued), Ok(last)]);
        }
        let monitor = TaskMonitor::new(Arc::new(source), config(4));

        let input: Vec<TaskHandle> = names.iter().map(|n| TaskHandle::new(n.clone())).collect();
        let reports = monitor.monitor(input.clone()).await.unwrap();

        assert_eq!(reports.len(), input.len());
        for (handle, report) in input.iter().zip(&reports) {
            let result = report.as_ref().unwrap();
            assert_eq!(&result.handle, handle);
        }
        let summary = MonitorSummary::from_reports(&reports);
        assert_eq!(summary.succeeded + summary.failed, 12);
        assert_eq!(summary.failed, 4);
    }

    #[tokio::test]
    async fn test_worker_pool_is_bounded() {
        let mut source = ScriptedSource::default();
        for i in 0..10 {
            source = source.script(
                &format!("job-{i}"),
                vec![Ok(TaskStatus::Running), Ok(TaskStatus::Running), Ok(TaskStatus::Succeeded)],
            );
        }
        let source = Arc::new(source);
        let monitor = TaskMonitor::new(source.clone(), config(2));

        let input: Vec<TaskHandle> = (0..10).map(|i| TaskHandle::new(format!("job-{i}"))).collect();
        monitor.monitor(input).await.unwrap();

        assert!(source.peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(source.calls.load(Ordering::SeqCst), 30);
    }

    #[tokio::test]
    async fn test_timeout_applies_per_handle() {
        let source = ScriptedSource::default()
            .script("stuck", vec![Ok(TaskStatus::Running)])
            .script("quick", vec![Ok(TaskStatus::Succeeded)]);
        let monitor = TaskMonitor::new(
            Arc::new(source),
            MonitorConfig {
                timeout: Some(Duration::from_millis(60)),
                ..config(2)
            },
        );

        let reports = monitor.monitor(handles(&["stuck", "quick"])).await.unwrap();
        assert!(matches!(&reports[0], Err(MonitorError::TimedOut { handle, .. }) if handle.as_str() == "stuck"));
        assert!(reports[1].as_ref().unwrap().succeeded());
    }

    #[tokio::test]
    async fn test_cancellation_ends_unfinished_handles() {
        let source = ScriptedSource::default().script("forever", vec![Ok(TaskStatus::Running)]);
        let token = CancellationToken::new();
        let monitor = TaskMonitor::new(Arc::new(source), config(1)).with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            token.cancel();
        });

        let reports = monitor.monitor(handles(&["forever"])).await.unwrap();
        canceller.await.unwrap();
        assert!(matches!(&reports[0], Err(MonitorError::Cancelled { .. })));
    }

    #[tokio::test]
    async fn test_monitor_one() {
        let source = ScriptedSource::default().script("solo", vec![Ok(TaskStatus::Queued), Ok(TaskStatus::Succeeded)]);
        let monitor = TaskMonitor::new(Arc::new(source), config(1));

        let result = monitor.monitor_one(&TaskHandle::new("solo")).await.unwrap();
        assert_eq!(result.status, TerminalStatus::Succeeded);
        assert_eq!(result.polls, 2);
    }

    #[tokio::test]
    async fn test_job_status_source_over_mock_client() {
        let client = MockCdmClient::new("http://mock/api");
        client.script_job("job-1", vec![TaskStatus::Queued, TaskStatus::Running, TaskStatus::Succeeded]);
        client.script_job("job-2", vec![TaskStatus::Queued, TaskStatus::Running, TaskStatus::Failed]);
        let shared: Arc<dyn CdmClientTrait> = Arc::new(client.clone());

        let monitor = TaskMonitor::new(Arc::new(JobStatusSource::new(shared)), config(2));
        let reports = monitor.monitor(handles(&["job-1", "job-2"])).await.unwrap();

        assert_eq!(reports[0].as_ref().unwrap().status, TerminalStatus::Succeeded);
        assert_eq!(reports[1].as_ref().unwrap().status, TerminalStatus::Failed);
        assert_eq!(client.job_polls("job-1"), 3);
        assert_eq!(client.job_polls("job-2"), 3);
    }
}
