//! Cluster-wide settings
//!
//! Timezone, NTP servers and syslog export targets of the appliance.

use crate::error::SpecError;
use crate::validation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Desired cluster settings; every field is optional and only the ones
/// present are reconciled
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    /// Cluster timezone (e.g. "America/Chicago")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// NTP servers; order is not significant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ntp_servers: Option<Vec<String>>,

    /// Syslog export targets
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub syslog: Vec<SyslogSpec>,
}

impl ClusterSpec {
    pub fn validate(&self) -> Result<(), SpecError> {
        if let Some(timezone) = &self.timezone {
            validation::timezone("cluster.timezone", timezone)?;
        }
        if let Some(servers) = &self.ntp_servers {
            if servers.is_empty() {
                return Err(SpecError::validation(
                    "cluster.ntpServers",
                    "must list at least one server",
                ));
            }
            for (i, server) in servers.iter().enumerate() {
                validation::hostname(&format!("cluster.ntpServers[{}]", i), server)?;
            }
        }
        for (i, syslog) in self.syslog.iter().enumerate() {
            syslog.validate(&format!("cluster.syslog[{}]", i))?;
        }
        Ok(())
    }

    /// NTP servers in canonical (sorted, deduplicated) order
    pub fn normalized_ntp_servers(&self) -> Option<Vec<String>> {
        self.ntp_servers.as_ref().map(|servers| normalize_servers(servers))
    }
}

/// Sort and deduplicate a server list so comparisons ignore ordering
pub fn normalize_servers(servers: &[String]) -> Vec<String> {
    let mut servers = servers.to_vec();
    servers.sort();
    servers.dedup();
    servers
}

/// Syslog transport protocol
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SyslogProtocol {
    #[default]
    Udp,
    Tcp,
}

impl SyslogProtocol {
    pub fn as_str(self) -> &'static str {
        match self {
            SyslogProtocol::Udp => "UDP",
            SyslogProtocol::Tcp => "TCP",
        }
    }
}

impl fmt::Display for SyslogProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One syslog export target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyslogSpec {
    pub hostname: String,
    #[serde(default = "default_syslog_port")]
    pub port: u16,
    #[serde(default)]
    pub protocol: SyslogProtocol,
}

fn default_syslog_port() -> u16 {
    514
}

impl SyslogSpec {
    pub fn validate(&self, field: &str) -> Result<(), SpecError> {
        validation::hostname(&format!("{}.hostname", field), &self.hostname)?;
        if self.port == 0 {
            return Err(SpecError::validation(format!("{}.port", field), "must be between 1 and 65535"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syslog_defaults() {
        let spec: SyslogSpec = serde_yaml::from_str("hostname: logs.lab").unwrap();
        assert_eq!(spec.port, 514);
        assert_eq!(spec.protocol, SyslogProtocol::Udp);
    }

    #[test]
    fn test_syslog_protocol_must_be_tcp_or_udp() {
        let parsed: Result<SyslogSpec, _> = serde_yaml::from_str("hostname: logs.lab\nprotocol: SCTP");
        assert!(parsed.is_err());
        let tcp: SyslogSpec = serde_yaml::from_str("hostname: logs.lab\nprotocol: TCP").unwrap();
        assert_eq!(tcp.protocol.as_str(), "TCP");
    }

    #[test]
    fn test_empty_ntp_list_is_rejected() {
        let spec = ClusterSpec {
            ntp_servers: Some(vec![]),
            ..Default::default()
        };
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_ntp_normalization_ignores_order() {
        let a = normalize_servers(&["b.ntp".to_string(), "a.ntp".to_string()]);
        let b = normalize_servers(&["a.ntp".to_string(), "b.ntp".to_string(), "a.ntp".to_string()]);
        assert_eq!(a, b);
    }
}
