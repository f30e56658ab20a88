//! CDM Applier
//!
//! One-shot tool that brings a CDM appliance in line with a YAML manifest:
//! - Cluster settings: timezone, NTP servers, syslog targets
//! - Protection: hosts, fileset templates, filesets, SLA Domain assignments
//! - Archival locations and on-demand snapshots, whose jobs are monitored
//!   until they finish
//!
//! Every resource is reconciled idempotently, so running it twice against
//! the same manifest changes nothing the second time.

mod applier;
#[cfg(test)]
mod applier_test;
mod config;
mod error;

use crate::applier::Applier;
use crate::config::ApplyConfig;
use crate::error::ApplyError;
use cdm_client::{CdmClient, CdmClientTrait};
use cdm_specs::Manifest;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ApplyError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting CDM applier");

    let config = ApplyConfig::from_env()?;
    info!("Configuration:");
    info!("  CDM node: {}", config.node);
    info!("  Manifest: {}", config.manifest.display());
    info!("  Poll interval: {:?}, workers: {}", config.poll_interval, config.max_workers);

    let manifest = Manifest::load(&config.manifest)?;

    let client = CdmClient::with_options(&config.node, config.credentials.clone(), config.client_options())?;
    client.validate_credentials().await?;
    info!("Connected to {}", client.base_url());

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling job monitoring");
            on_signal.cancel();
        }
    });

    let applier = Applier::new(Arc::new(client), config.monitor_config())
        .with_wait_for_jobs(config.wait_for_jobs)
        .with_cancellation(cancel);
    let report = applier.apply(&manifest).await?;
    report.log_summary();
    report.ensure_complete()
}
