//! Idempotent reconciliation
//!
//! Every mutating call goes through the same pattern:
//! 1. Fetch the current remote state
//! 2. If it is absent (`Ok(None)` or `CdmError::NotFound`), apply
//! 3. If it exists and compares equal to the desired state, do nothing
//! 4. Otherwise apply, and report what the apply call returned
//!
//! `fetch_current` and `apply` are passed as futures. Futures do nothing
//! until polled, so an `apply` future handed to a reconciliation that ends
//! in `NoChangeRequired` never reaches the appliance.

use crate::comparison::Comparison;
use crate::error::ReconcileError;
use crate::state::{CurrentState, DesiredState};
use cdm_client::CdmError;
use std::fmt;
use std::future::Future;
use tracing::{debug, error, info, warn};

/// Result of one reconciliation
#[derive(Debug)]
pub enum ReconciliationOutcome<R> {
    /// The remote resource already matched; nothing was sent
    NoChangeRequired,
    /// The mutation was issued; carries its result
    Applied(R),
    /// Fetching, validating or applying failed
    Failed(ReconcileError),
}

impl<R> ReconciliationOutcome<R> {
    /// Log and wrap an error raised before or around the reconcile call
    pub fn failed(resource: &str, err: impl Into<ReconcileError>) -> Self {
        let err = err.into();
        error!("Failed to reconcile {}: {}", resource, err);
        ReconciliationOutcome::Failed(err)
    }

    /// Whether the remote resource already matched
    pub fn is_no_change(&self) -> bool {
        matches!(self, ReconciliationOutcome::NoChangeRequired)
    }

    /// Whether a mutation was issued and succeeded
    pub fn is_applied(&self) -> bool {
        matches!(self, ReconciliationOutcome::Applied(_))
    }

    /// Whether the reconciliation failed
    pub fn is_failed(&self) -> bool {
        matches!(self, ReconciliationOutcome::Failed(_))
    }

    /// Result of the apply call, if one was made
    pub fn applied(&self) -> Option<&R> {
        match self {
            ReconciliationOutcome::Applied(result) => Some(result),
            _ => None,
        }
    }

    /// Transform the apply result, keeping the other variants
    pub fn map<U>(self, f: impl FnOnce(R) -> U) -> ReconciliationOutcome<U> {
        match self {
            ReconciliationOutcome::NoChangeRequired => ReconciliationOutcome::NoChangeRequired,
            ReconciliationOutcome::Applied(result) => ReconciliationOutcome::Applied(f(result)),
            ReconciliationOutcome::Failed(err) => ReconciliationOutcome::Failed(err),
        }
    }

    /// `Ok(None)` for no change, `Ok(Some(result))` when applied
    pub fn into_result(self) -> Result<Option<R>, ReconcileError> {
        match self {
            ReconciliationOutcome::NoChangeRequired => Ok(None),
            ReconciliationOutcome::Applied(result) => Ok(Some(result)),
            ReconciliationOutcome::Failed(err) => Err(err),
        }
    }
}

/// Reconcile one resource
///
/// `compare` is only evaluated when current state exists; `apply` is only
/// awaited when current state is absent or `compare` returns false.
pub async fn reconcile<D, C, R, FGet, FCompare, FApply>(
    resource: &str,
    desired: &D,
    fetch_current: FGet,
    compare: FCompare,
    apply: FApply,
) -> ReconciliationOutcome<R>
where
    FGet: Future<Output = Result<Option<C>, CdmError>>,
    FCompare: FnOnce(&D, &C) -> bool,
    FApply: Future<Output = Result<R, CdmError>>,
{
    let current = match fetch_current.await {
        Ok(current) => current,
        Err(CdmError::NotFound(_)) => None,
        Err(e) => {
            error!("Failed to fetch current state of {}: {}", resource, e);
            return ReconciliationOutcome::Failed(ReconcileError::Client(e));
        }
    };

    let Some(current) = current else {
        warn!("{} does not exist, will create", resource);
        return apply_change(resource, apply).await;
    };

    if compare(desired, &current) {
        debug!("{} already up-to-date, no change required", resource);
        return ReconciliationOutcome::NoChangeRequired;
    }

    info!("{} differs from desired state, applying", resource);
    apply_change(resource, apply).await
}

/// Reconcile field maps under an explicit comparison policy
///
/// Differing fields are logged before the change is applied.
pub async fn reconcile_state<R, FGet, FApply>(
    resource: &str,
    desired: &DesiredState,
    fetch_current: FGet,
    comparison: &Comparison,
    apply: FApply,
) -> ReconciliationOutcome<R>
where
    FGet: Future<Output = Result<Option<CurrentState>, CdmError>>,
    FApply: Future<Output = Result<R, CdmError>>,
{
    let compare = |desired: &DesiredState, current: &CurrentState| {
        let drift = comparison.differences(desired, current);
        if !drift.is_empty() {
            warn!("{} drifted on fields {:?}", resource, drift);
        }
        drift.is_empty()
    };
    reconcile(resource, desired, fetch_current, compare, apply).await
}

/// Apply without fetching, for resources the caller knows are new
/// (on-demand jobs, freshly created parents)
///
/// `desired` is only logged at debug level.
pub async fn reconcile_new<D, R, FApply>(resource: &str, desired: &D, apply: FApply) -> ReconciliationOutcome<R>
where
    D: fmt::Debug + ?Sized,
    FApply: Future<Output = Result<R, CdmError>>,
{
    info!("Applying {} without a current-state check", resource);
    debug!("Desired state of {}: {:?}", resource, desired);
    apply_change(resource, apply).await
}

async fn apply_change<R, FApply>(resource: &str, apply: FApply) -> ReconciliationOutcome<R>
where
    FApply: Future<Output = Result<R, CdmError>>,
{
    match apply.await {
        Ok(result) => {
            info!("Applied {}", resource);
            ReconciliationOutcome::Applied(result)
        }
        Err(e) => {
            error!("Failed to apply {}: {}", resource, e);
            ReconciliationOutcome::Failed(ReconcileError::Client(e))
        }
    }
}
