//! Settings schema for sshmark
//!
//! Defines the structure and defaults for the config.json file.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How `list` orders hosts when no `--sort` is given
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Most recently used first
    #[default]
    Recency,
    /// Most used first
    Frequency,
    /// Alphabetical
    Name,
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortMode::Recency => "recency",
            SortMode::Frequency => "frequency",
            SortMode::Name => "name",
        };
        f.write_str(s)
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recency" | "recent" => Ok(SortMode::Recency),
            "frequency" | "freq" => Ok(SortMode::Frequency),
            "name" => Ok(SortMode::Name),
            other => Err(format!(
                "Invalid sort mode: '{other}'. Use recency, frequency, or name"
            )),
        }
    }
}

/// Main settings structure for sshmark
///
/// Serialized to/from `~/.config/sshmark/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Config file version for migrations
    pub version: u32,

    /// SSH client config to manage (default: `~/.ssh/config`)
    /// A leading `~/` is expanded to the home directory.
    #[serde(default)]
    pub ssh_config: Option<String>,

    /// Default ordering for `list` (default: "recency")
    #[serde(default)]
    pub default_sort: SortMode,

    /// Drop history for deleted hosts whenever hosts are listed (default: false)
    #[serde(default)]
    pub prune_history: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            ssh_config: None,
            default_sort: SortMode::default(),
            prune_history: false,
        }
    }
}

impl Config {
    /// Create a new Config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// The SSH config file this configuration points at
    ///
    /// Falls back to `~/.ssh/config` when unset.
    pub fn ssh_config_path(&self) -> Option<PathBuf> {
        match self.ssh_config.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => Some(expand_home(path)),
            _ => crate::host::get_ssh_config_path(),
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, 1);
        assert!(config.ssh_config.is_none());
        assert_eq!(config.default_sort, SortMode::Recency);
        assert!(!config.prune_history);
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let config = Config {
            version: 1,
            ssh_config: Some("/etc/ssh/ssh_config".to_string()),
            default_sort: SortMode::Frequency,
            prune_history: true,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""default_sort":"frequency""#));
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_deserialize_with_missing_optional_fields() {
        let json = r#"{"version": 1}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_reject_unknown_fields() {
        let json = r#"{"version": 1, "sort": "name"}"#;
        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_reject_unknown_sort_mode() {
        let json = r#"{"version": 1, "default_sort": "random"}"#;
        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_sort_mode_from_str() {
        assert_eq!("recency".parse::<SortMode>(), Ok(SortMode::Recency));
        assert_eq!("Frequency".parse::<SortMode>(), Ok(SortMode::Frequency));
        assert_eq!("name".parse::<SortMode>(), Ok(SortMode::Name));
        assert!("size".parse::<SortMode>().is_err());
    }

    #[test]
    fn test_ssh_config_path_explicit() {
        let config = Config {
            ssh_config: Some("/tmp/custom_config".to_string()),
            ..Config::default()
        };
        assert_eq!(
            config.ssh_config_path(),
            Some(PathBuf::from("/tmp/custom_config"))
        );
    }

    #[test]
    fn test_ssh_config_path_expands_home() {
        let config = Config {
            ssh_config: Some("~/.ssh/work_config".to_string()),
            ..Config::default()
        };
        let path = config.ssh_config_path().unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with(".ssh/work_config"));
    }

    #[test]
    fn test_ssh_config_path_default() {
        let path = Config::default().ssh_config_path().unwrap();
        assert!(path.ends_with(".ssh/config"));
    }
}
