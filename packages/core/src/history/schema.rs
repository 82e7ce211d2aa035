//! Connection history schema
//!
//! Data structures persisted in the history JSON document.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::HistoryError;

/// Kind of SSH port forwarding
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ForwardType {
    /// `-L`
    Local,
    /// `-R`
    Remote,
    /// `-D`
    Dynamic,
}

impl ForwardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForwardType::Local => "local",
            ForwardType::Remote => "remote",
            ForwardType::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for ForwardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForwardType {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(ForwardType::Local),
            "remote" => Ok(ForwardType::Remote),
            "dynamic" => Ok(ForwardType::Dynamic),
            other => Err(HistoryError::Validation(format!(
                "forwarding type must be local, remote or dynamic, got '{other}'"
            ))),
        }
    }
}

/// Last port forwarding setup used with a connection
///
/// Ports are kept as entered; the document stores them as strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortForwardConfig {
    #[serde(rename = "type")]
    pub forward_type: ForwardType,

    #[serde(default)]
    pub local_port: String,

    #[serde(default)]
    pub remote_host: String,

    #[serde(default)]
    pub remote_port: String,

    #[serde(default)]
    pub bind_address: String,
}

impl PortForwardConfig {
    /// Format as the `ssh` flag pair, e.g. `-L 127.0.0.1:8080:db:5432`
    pub fn to_ssh_args(&self) -> Vec<String> {
        let mut spec = String::new();
        if !self.bind_address.is_empty() {
            spec.push_str(&self.bind_address);
            spec.push(':');
        }
        spec.push_str(&self.local_port);

        let flag = match self.forward_type {
            ForwardType::Local => "-L",
            ForwardType::Remote => "-R",
            ForwardType::Dynamic => "-D",
        };
        if self.forward_type != ForwardType::Dynamic {
            spec.push_str(&format!(":{}:{}", self.remote_host, self.remote_port));
        }
        vec![flag.to_string(), spec]
    }
}

/// Usage record for one identifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionInfo {
    /// Host name or manual connection identifier
    #[serde(rename = "host_name")]
    pub identifier: String,

    pub last_connect: DateTime<Utc>,

    pub connect_count: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_forwarding: Option<PortForwardConfig>,
}

/// Root structure of the history file
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConnectionHistory {
    /// Map of identifier to usage record
    #[serde(default)]
    pub connections: BTreeMap<String, ConnectionInfo>,
}
