//! Manual connection identifiers
//!
//! A connection made without a named config entry (`ssh -p 2222 root@10.0.0.1`)
//! is tracked under an identifier of the form `manual:<user>@<hostname>:<port>`.
//! That text is a key in the history document, so its format must not change.
//!
//! Decoding cannot tell whether the user or port were originally empty: an
//! empty user is stored as `default` and an empty port as `22`, and both
//! decode back to those placeholders.

use std::path::Path;

use super::error::HistoryError;
use crate::host::{DEFAULT_SSH_PORT, HostRecord};

/// Prefix reserved for manual connection identifiers
pub const MANUAL_PREFIX: &str = "manual:";

/// User placeholder stored when a connection has no user
pub const DEFAULT_USER_PLACEHOLDER: &str = "default";

const DEFAULT_PORT: &str = "22";

/// An ad-hoc `user@host:port` connection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualConnection {
    pub user: String,
    pub hostname: String,
    pub port: String,
    pub identity: String,
}

impl ManualConnection {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            ..Default::default()
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = port.into();
        self
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    /// History key for this connection
    pub fn identifier(&self) -> String {
        encode(self)
    }
}

/// Fields recovered from a manual identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedIdentifier {
    pub user: String,
    pub hostname: String,
    pub port: String,
}

/// Encode a connection as `manual:<user>@<hostname>:<port>`
pub fn encode(conn: &ManualConnection) -> String {
    let user = if conn.user.is_empty() {
        DEFAULT_USER_PLACEHOLDER
    } else {
        &conn.user
    };
    let port = if conn.port.is_empty() {
        DEFAULT_PORT
    } else {
        &conn.port
    };
    format!("{MANUAL_PREFIX}{user}@{}:{port}", conn.hostname)
}

/// Decode a manual identifier
///
/// The port is everything after the last `:`, the user everything before
/// the first `@`, so IPv6 hostnames decode correctly.
pub fn decode(identifier: &str) -> Option<DecodedIdentifier> {
    let rest = identifier.strip_prefix(MANUAL_PREFIX)?;
    let (user_host, port) = rest.rsplit_once(':')?;
    let (user, hostname) = user_host.split_once('@')?;
    Some(DecodedIdentifier {
        user: user.to_string(),
        hostname: hostname.to_string(),
        port: port.to_string(),
    })
}

/// Check if an identifier names a manual connection
pub fn is_manual(identifier: &str) -> bool {
    identifier.starts_with(MANUAL_PREFIX)
}

/// Extract a manual connection from `ssh`-style arguments
///
/// Returns `None` when no hostname is found, or when the invocation names a
/// config file (`-F`, `-c`, `--config`), since that is not a manual
/// connection. `default_user` is used when no `user@` token is present.
pub fn parse_ssh_args<S: AsRef<str>>(args: &[S], default_user: &str) -> Option<ManualConnection> {
    let mut conn = ManualConnection {
        user: default_user.to_string(),
        port: DEFAULT_PORT.to_string(),
        ..Default::default()
    };

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_ref();
        let next: Option<&str> = args.get(i + 1).map(|a| a.as_ref());

        if arg == "-p" {
            if let Some(port) = next {
                conn.port = port.to_string();
                i += 1;
            }
        } else if let Some(port) = arg.strip_prefix("-p") {
            conn.port = port.to_string();
        } else if arg == "-i" {
            if let Some(identity) = next {
                conn.identity = identity.to_string();
                i += 1;
            }
        } else if matches!(arg, "-F" | "-c" | "--config") {
            return None;
        } else if arg.starts_with('-') {
            // Other flags; skip their value if they have one
            if next.is_some_and(|n| !n.starts_with('-')) {
                i += 1;
            }
        } else if let Some((user, hostname)) = arg.split_once('@') {
            conn.user = user.to_string();
            conn.hostname = hostname.to_string();
        } else if conn.hostname.is_empty() {
            conn.hostname = arg.to_string();
        }
        i += 1;
    }

    (!conn.hostname.is_empty()).then_some(conn)
}

/// Check whether arguments look like a manual connection rather than a host alias
pub fn is_manual_ssh_command<S: AsRef<str>>(args: &[S]) -> bool {
    args.iter().any(|arg| {
        let arg = arg.as_ref();
        arg.starts_with("-p") || arg.contains('@')
    })
}

/// Build a config host from a manual identifier
///
/// Placeholder values (`default` user, port 22) are left unset.
pub fn promote(identifier: &str, name: &str) -> Result<HostRecord, HistoryError> {
    if !is_manual(identifier) {
        return Err(HistoryError::Validation(format!(
            "'{identifier}' is not a manual connection"
        )));
    }
    let decoded = decode(identifier).ok_or_else(|| {
        HistoryError::Validation(format!("'{identifier}' is not a valid manual identifier"))
    })?;

    let mut record = HostRecord::new(name).with_hostname(decoded.hostname);
    if decoded.user != DEFAULT_USER_PLACEHOLDER && !decoded.user.is_empty() {
        record = record.with_user(decoded.user);
    }
    let port: u16 = decoded.port.parse().map_err(|_| {
        HistoryError::Validation(format!("'{}' is not a valid port", decoded.port))
    })?;
    if port != DEFAULT_SSH_PORT {
        record = record.with_port(port);
    }
    Ok(record)
}

/// Arguments to pass to `ssh` to reconnect to an identifier
///
/// Named hosts are reached through the config file; manual identifiers are
/// expanded back into `[-p port] user@hostname`.
pub fn reconnect_args(identifier: &str, config_file: Option<&Path>) -> Option<Vec<String>> {
    let mut args = Vec::new();

    if is_manual(identifier) {
        let decoded = decode(identifier)?;
        if !decoded.port.is_empty() && decoded.port != DEFAULT_PORT {
            args.push("-p".to_string());
            args.push(decoded.port);
        }
        if decoded.user.is_empty() || decoded.user == DEFAULT_USER_PLACEHOLDER {
            args.push(decoded.hostname);
        } else {
            args.push(format!("{}@{}", decoded.user, decoded.hostname));
        }
    } else {
        if let Some(config) = config_file {
            args.push("-F".to_string());
            args.push(config.display().to_string());
        }
        args.push(identifier.to_string());
    }

    Some(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded(user: &str, hostname: &str, port: &str) -> DecodedIdentifier {
        DecodedIdentifier {
            user: user.to_string(),
            hostname: hostname.to_string(),
            port: port.to_string(),
        }
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let cases = [
            (
                ManualConnection::new("127.0.0.1")
                    .with_user("guillaume")
                    .with_port("2222")
                    .with_identity("~/.ssh/id_rsa"),
                "manual:guillaume@127.0.0.1:2222",
                decoded("guillaume", "127.0.0.1", "2222"),
            ),
            (
                ManualConnection::new("example.com").with_user("user"),
                "manual:user@example.com:22",
                decoded("user", "example.com", "22"),
            ),
            (
                ManualConnection::new("example.com").with_port("2222"),
                "manual:default@example.com:2222",
                decoded("default", "example.com", "2222"),
            ),
        ];

        for (conn, id, expected) in cases {
            let encoded = encode(&conn);
            assert_eq!(encoded, id);
            assert!(is_manual(&encoded));
            assert_eq!(decode(&encoded), Some(expected));
        }
    }

    #[test]
    fn test_defaulted_values_are_indistinguishable() {
        let implicit = ManualConnection::new("h");
        let explicit = ManualConnection::new("h").with_user("default").with_port("22");
        assert_eq!(encode(&implicit), encode(&explicit));
    }

    #[test]
    fn test_decode_ipv6_hostname() {
        let id = encode(&ManualConnection::new("fe80::1").with_user("root"));
        assert_eq!(decode(&id), Some(decoded("root", "fe80::1", "22")));
    }

    #[test]
    fn test_decode_invalid() {
        assert_eq!(decode("myhost"), None);
        assert_eq!(decode("manual:invalid"), None);
        assert_eq!(decode("manual:hostname:22"), None);
        assert_eq!(decode("Manual:u@h:22"), None);
    }

    #[test]
    fn test_is_manual_prefix_only() {
        assert!(is_manual("manual:u@h:22"));
        assert!(!is_manual("web"));
        assert!(!is_manual("xmanual:u@h:22"));
    }

    #[test]
    fn test_parse_ssh_args() {
        let conn = parse_ssh_args(&["user@example.com"], "me").unwrap();
        assert_eq!(conn, ManualConnection::new("example.com").with_user("user").with_port("22"));

        let conn = parse_ssh_args(&["-p", "2222", "user@example.com"], "me").unwrap();
        assert_eq!(conn.port, "2222");

        let conn = parse_ssh_args(&["-p2222", "user@example.com"], "me").unwrap();
        assert_eq!(conn.port, "2222");

        let conn = parse_ssh_args(
            &["-p", "2222", "-i", "~/.ssh/id_rsa", "guillaume@127.0.0.1"],
            "me",
        )
        .unwrap();
        assert_eq!(
            conn,
            ManualConnection::new("127.0.0.1")
                .with_user("guillaume")
                .with_port("2222")
                .with_identity("~/.ssh/id_rsa")
        );
    }

    #[test]
    fn test_parse_ssh_args_defaults_user() {
        let conn = parse_ssh_args(&["example.com"], "alice").unwrap();
        assert_eq!(conn.user, "alice");
        assert_eq!(conn.hostname, "example.com");
        assert_eq!(conn.port, "22");
    }

    #[test]
    fn test_parse_ssh_args_rejections() {
        assert_eq!(parse_ssh_args(&["-F", "~/.ssh/config", "host"], "me"), None);
        assert_eq!(parse_ssh_args(&["host", "--config", "x"], "me"), None);
        assert_eq!(parse_ssh_args::<&str>(&[], "me"), None);
        assert_eq!(parse_ssh_args(&["-p", "2222"], "me"), None);
    }

    #[test]
    fn test_parse_ssh_args_skips_flag_values() {
        let conn = parse_ssh_args(&["-o", "StrictHostKeyChecking=no", "root@h"], "me").unwrap();
        assert_eq!(conn.hostname, "h");
        assert_eq!(conn.user, "root");

        // First bare token wins as hostname; later ones are the remote command
        let conn = parse_ssh_args(&["h1", "uptime"], "me").unwrap();
        assert_eq!(conn.hostname, "h1");
    }

    #[test]
    fn test_is_manual_ssh_command() {
        assert!(is_manual_ssh_command(&["user@example.com"]));
        assert!(is_manual_ssh_command(&["-p", "2222", "host"]));
        assert!(is_manual_ssh_command(&["-p2222", "host"]));
        assert!(!is_manual_ssh_command(&["myhost"]));
        assert!(!is_manual_ssh_command::<&str>(&[]));
    }

    #[test]
    fn test_promote() {
        let record = promote("manual:root@10.0.0.1:2222", "box").unwrap();
        assert_eq!(record.name, "box");
        assert_eq!(record.hostname.as_deref(), Some("10.0.0.1"));
        assert_eq!(record.user.as_deref(), Some("root"));
        assert_eq!(record.port, Some(2222));

        let record = promote("manual:default@example.com:22", "ex").unwrap();
        assert!(record.user.is_none());
        assert!(record.port.is_none());

        assert!(matches!(
            promote("web", "web2"),
            Err(HistoryError::Validation(_))
        ));
        assert!(promote("manual:u@h:ssh", "x").is_err());
    }

    #[test]
    fn test_reconnect_args() {
        let args = reconnect_args("manual:root@10.0.0.1:2222", None).unwrap();
        assert_eq!(args, vec!["-p", "2222", "root@10.0.0.1"]);

        let args = reconnect_args("manual:default@example.com:22", None).unwrap();
        assert_eq!(args, vec!["example.com"]);

        let args = reconnect_args("web", Some(Path::new("/tmp/ssh_config"))).unwrap();
        assert_eq!(args, vec!["-F", "/tmp/ssh_config", "web"]);

        assert_eq!(reconnect_args("manual:broken", None), None);
    }
}
