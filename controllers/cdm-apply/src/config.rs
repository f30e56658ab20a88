//! Applier configuration from environment variables

use crate::error::ApplyError;
use cdm_client::{ClientOptions, Credentials, DEFAULT_TIMEOUT_SECS};
use cdm_ops::{DEFAULT_MAX_WORKERS, DEFAULT_POLL_INTERVAL, MonitorConfig};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MANIFEST: &str = "cdm-manifest.yaml";

#[derive(Debug, Clone)]
pub struct ApplyConfig {
    pub node: String,
    pub credentials: Credentials,
    pub manifest: PathBuf,
    pub poll_interval: Duration,
    pub max_workers: usize,
    pub job_timeout: Option<Duration>,
    pub request_timeout: Duration,
    pub wait_for_jobs: bool,
}

impl ApplyConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ApplyError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through `lookup`, which returns the value of a
    /// variable if it is set
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApplyError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let node = var("CDM_NODE")
            .ok_or_else(|| ApplyError::InvalidConfig("CDM_NODE environment variable is required".to_string()))?;

        let credentials = match (var("CDM_API_TOKEN"), var("CDM_USERNAME"), var("CDM_PASSWORD")) {
            (Some(token), _, _) => Credentials::Token(token),
            (None, Some(username), Some(password)) => Credentials::Basic { username, password },
            _ => {
                return Err(ApplyError::InvalidConfig(
                    "CDM_API_TOKEN or CDM_USERNAME and CDM_PASSWORD must be set".to_string(),
                ));
            }
        };

        let poll_secs: u64 = parse_or(&var, "CDM_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL.as_secs())?;
        let max_workers: usize = parse_or(&var, "CDM_MAX_WORKERS", DEFAULT_MAX_WORKERS)?;
        if max_workers == 0 {
            return Err(ApplyError::InvalidConfig("CDM_MAX_WORKERS must be at least 1".to_string()));
        }
        let request_secs: u64 = parse_or(&var, "CDM_REQUEST_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let job_timeout = match var("CDM_JOB_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(parse("CDM_JOB_TIMEOUT_SECS", &raw)?)),
            None => None,
        };

        Ok(Self {
            node,
            credentials,
            manifest: var("CDM_MANIFEST").unwrap_or_else(|| DEFAULT_MANIFEST.to_string()).into(),
            poll_interval: Duration::from_secs(poll_secs),
            max_workers,
            job_timeout,
            request_timeout: Duration::from_secs(request_secs),
            wait_for_jobs: parse_or(&var, "CDM_WAIT_FOR_JOBS", true)?,
        })
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            timeout: self.request_timeout,
            ..ClientOptions::default()
        }
    }

    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            poll_interval: self.poll_interval,
            max_workers: self.max_workers,
            timeout: self.job_timeout,
        }
    }
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T, ApplyError> {
    raw.trim()
        .parse()
        .map_err(|_| ApplyError::InvalidConfig(format!("{} has an invalid value: '{}'", key, raw)))
}

fn parse_or<T: FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, ApplyError> {
    match var(key) {
        Some(raw) => parse(key, &raw),
        None => Ok(default),
    }
}
