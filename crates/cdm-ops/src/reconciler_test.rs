//! Unit tests for the reconciler module

#[cfg(test)]
mod tests {
    use crate::comparison::Comparison;
    use crate::error::ReconcileError;
    use crate::reconciler::*;
    use crate::state::{CurrentState, DesiredState};
    use cdm_client::CdmError;
    use cdm_specs::SnapshotSpec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tz(value: &str) -> DesiredState {
        DesiredState::new().with("timezone", value)
    }

    fn current_tz(value: &str) -> CurrentState {
        CurrentState::new().with("timezone", value)
    }

    #[tokio::test]
    async fn test_matching_state_never_applies() {
        let applies = AtomicUsize::new(0);
        let outcome: ReconciliationOutcome<()> = reconcile_state(
            "cluster timezone",
            &tz("America/Chicago"),
            async { Ok(Some(current_tz("America/Chicago"))) },
            &Comparison::Exact,
            async {
                applies.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
        )
        .await;

        assert!(outcome.is_no_change());
        assert_eq!(applies.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_drift_applies_and_returns_result() {
        let outcome = reconcile_state(
            "cluster timezone",
            &tz("America/Chicago"),
            async { Ok(Some(current_tz("America/Los_Angeles"))) },
            &Comparison::Exact,
            async { Ok("patched") },
        )
        .await;

        assert_eq!(outcome.applied(), Some(&"patched"));
    }

    #[tokio::test]
    async fn test_not_found_means_absent_and_triggers_creation() {
        let applies = AtomicUsize::new(0);
        let outcome = reconcile_state(
            "host db01.lab",
            &DesiredState::new().with("hostname", "db01.lab"),
            async { Err(CdmError::NotFound("physical_host 'db01.lab'".to_string())) },
            &Comparison::fields(["hostname"]),
            async {
                applies.fetch_add(1, Ordering::SeqCst);
                Ok(42)
            },
        )
        .await;

        assert_eq!(outcome.applied(), Some(&42));
        assert_eq!(applies.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_none_means_absent_without_compare() {
        let outcome = reconcile(
            "syslog logs.lab",
            &1,
            async { Ok(None::<i32>) },
            |_: &i32, _: &i32| panic!("compare must not run without current state"),
            async { Ok(()) },
        )
        .await;
        assert!(outcome.is_applied());
    }

    #[tokio::test]
    async fn test_fetch_error_fails_without_applying() {
        let applies = AtomicUsize::new(0);
        let outcome: ReconciliationOutcome<()> = reconcile_state(
            "cluster timezone",
            &tz("UTC"),
            async {
                Err(CdmError::Api {
                    status: 503,
                    message: "unavailable".to_string(),
                })
            },
            &Comparison::Exact,
            async {
                applies.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
        )
        .await;

        match outcome {
            ReconciliationOutcome::Failed(ReconcileError::Client(e)) => assert_eq!(e.status(), Some(503)),
            other => panic!("expected Failed, got {other:?}"),
        }
        assert_eq!(applies.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_apply_error_is_failed() {
        let outcome: ReconciliationOutcome<()> = reconcile_state(
            "cluster timezone",
            &tz("UTC"),
            async { Ok(Some(current_tz("America/Chicago"))) },
            &Comparison::Exact,
            async { Err(CdmError::Authentication("token expired".to_string())) },
        )
        .await;

        assert!(outcome.is_failed());
        assert!(outcome.into_result().is_err());
    }

    #[tokio::test]
    async fn test_reconcile_new_always_applies() {
        let applies = AtomicUsize::new(0);
        let spec = SnapshotSpec {
            vm: "web01".to_string(),
            sla: None,
        };
        let outcome = reconcile_new("snapshot of web01", &spec, async {
            applies.fetch_add(1, Ordering::SeqCst);
            Ok("job-1")
        })
        .await;

        assert_eq!(outcome.map(str::len).into_result().unwrap(), Some(5));
        assert_eq!(applies.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_second_run_is_a_no_op() {
        // First run converges the remote value, second run sees it and skips
        let remote = std::sync::Mutex::new("America/Los_Angeles".to_string());
        let desired = tz("America/Chicago");

        for expected_applied in [true, false] {
            let current = current_tz(&remote.lock().unwrap());
            let outcome = reconcile_state(
                "cluster timezone",
                &desired,
                async { Ok(Some(current)) },
                &Comparison::Exact,
                async {
                    *remote.lock().unwrap() = "America/Chicago".to_string();
                    Ok(())
                },
            )
            .await;
            assert_eq!(outcome.is_applied(), expected_applied);
        }
        assert_eq!(*remote.lock().unwrap(), "America/Chicago");
    }
}
