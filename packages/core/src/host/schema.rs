//! Host record schema
//!
//! In-memory representation of one named entry of an SSH config file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default SSH port, used when a block carries no `Port` line
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Accepted values for `RequestTTY`
pub const REQUEST_TTY_VALUES: [&str; 4] = ["yes", "no", "force", "auto"];

/// A config key the store does not interpret, kept verbatim
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SshOption {
    pub key: String,
    pub value: String,
}

impl SshOption {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One host name resolved from a `Host` block
///
/// Every record resolved from the same block carries identical non-name
/// fields and the same `source_file`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostRecord {
    /// Alias declared on the `Host` line
    pub name: String,

    /// `HostName` (real hostname or IP)
    #[serde(default)]
    pub hostname: Option<String>,

    /// `User`
    #[serde(default)]
    pub user: Option<String>,

    /// `Port`
    #[serde(default)]
    pub port: Option<u16>,

    /// `IdentityFile`
    #[serde(default)]
    pub identity_file: Option<String>,

    /// `ProxyJump`
    #[serde(default)]
    pub proxy_jump: Option<String>,

    /// Unrecognized keys, in file order
    #[serde(default)]
    pub options: Vec<SshOption>,

    /// Tags from the `# Tags:` comment line
    #[serde(default)]
    pub tags: Vec<String>,

    /// `RemoteCommand`
    #[serde(default)]
    pub remote_command: Option<String>,

    /// `RequestTTY`
    #[serde(default)]
    pub request_tty: Option<String>,

    /// Config file the record was read from
    #[serde(default)]
    pub source_file: PathBuf,
}

impl HostRecord {
    /// Create a record with just a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder pattern: set hostname
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Builder pattern: set user
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Builder pattern: set port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Builder pattern: set identity file
    pub fn with_identity_file(mut self, path: impl Into<String>) -> Self {
        self.identity_file = Some(path.into());
        self
    }

    /// Builder pattern: set jump host
    pub fn with_proxy_jump(mut self, jump: impl Into<String>) -> Self {
        self.proxy_jump = Some(jump.into());
        self
    }

    /// Builder pattern: add an option line
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push(SshOption::new(key, value));
        self
    }

    /// Builder pattern: add tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Builder pattern: set remote command
    pub fn with_remote_command(mut self, command: impl Into<String>) -> Self {
        self.remote_command = Some(command.into());
        self
    }

    /// Builder pattern: set RequestTTY mode
    pub fn with_request_tty(mut self, mode: impl Into<String>) -> Self {
        self.request_tty = Some(mode.into());
        self
    }

    /// Copy of this record under another name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Port ssh will actually use
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_SSH_PORT)
    }

    /// Check whether two records share every field except the name
    pub fn same_fields(&self, other: &HostRecord) -> bool {
        self.renamed(other.name.clone()) == *other
    }

    /// Check if the record carries the given tag (case-insensitive)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Format the connection target for display, e.g. `deploy@web-1:2222`
    pub fn display_target(&self) -> String {
        let host = self.hostname.as_deref().unwrap_or(&self.name);
        let mut target = match &self.user {
            Some(user) => format!("{user}@{host}"),
            None => host.to_string(),
        };
        if let Some(port) = self.port {
            if port != DEFAULT_SSH_PORT {
                target.push_str(&format!(":{port}"));
            }
        }
        target
    }
}
