//! Settings management for sshmark
//!
//! Handles loading, saving, and validating the JSONC settings file.
//! Creates a default file if missing, validates against schema.

pub mod paths;
pub mod schema;

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jsonc_parser::parse_to_serde_value;

pub use paths::{
    get_config_dir, get_config_path, get_history_path, get_legacy_history_path, get_ssh_dir,
};
pub use schema::{Config, SortMode};

/// Ensure the config directory exists
///
/// Creates `~/.config/sshmark/` if it doesn't exist.
/// Returns the path to the config directory.
pub fn ensure_config_dir() -> Result<PathBuf> {
    let config_dir =
        get_config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    ensure_dir(&config_dir)?;
    Ok(config_dir)
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(dir, fs::Permissions::from_mode(0o700)).with_context(|| {
                format!("Failed to set permissions on: {}", dir.display())
            })?;
        }
        tracing::info!("Created config directory: {}", dir.display());
    }
    Ok(())
}

/// Load settings from the default settings file
///
/// If the file doesn't exist, creates a new one with default values.
pub fn load_config() -> Result<Config> {
    let config_path =
        get_config_path().ok_or_else(|| anyhow::anyhow!("Could not determine config file path"))?;
    load_config_from(&config_path)
}

/// Load settings from a specific file
///
/// Supports JSONC (JSON with comments).
/// Rejects unknown fields for strict validation.
pub fn load_config_from(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        tracing::info!(
            "Config file not found, creating default at: {}",
            config_path.display()
        );
        let config = Config::default();
        save_config_to(&config, config_path)?;
        return Ok(config);
    }

    let mut file = File::open(config_path)
        .with_context(|| format!("Failed to open config file: {}", config_path.display()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

    // Parse JSONC (JSON with comments)
    let parsed_value = parse_to_serde_value(&contents, &Default::default())
        .map_err(|e| anyhow::anyhow!("Invalid JSONC in config file: {}", e))?
        .ok_or_else(|| anyhow::anyhow!("Config file is empty"))?;

    // deny_unknown_fields rejects unknown keys here
    let config: Config = serde_json::from_value(parsed_value).with_context(|| {
        format!(
            "Invalid configuration in {}. Check for unknown fields or invalid values.",
            config_path.display()
        )
    })?;

    tracing::debug!("Loaded config from: {}", config_path.display());
    Ok(config)
}

/// Save settings to the default settings file
pub fn save_config(config: &Config) -> Result<()> {
    ensure_config_dir()?;
    let config_path =
        get_config_path().ok_or_else(|| anyhow::anyhow!("Could not determine config file path"))?;
    save_config_to(config, &config_path)
}

/// Save settings to a specific file
///
/// Creates a backup of the existing file (config.json.bak) before overwriting.
pub fn save_config_to(config: &Config, config_path: &Path) -> Result<()> {
    if let Some(dir) = config_path.parent() {
        ensure_dir(dir)?;
    }

    if config_path.exists() {
        let backup_path = config_path.with_extension("json.bak");
        fs::copy(config_path, &backup_path)
            .with_context(|| format!("Failed to create backup at: {}", backup_path.display()))?;
        tracing::debug!("Created config backup: {}", backup_path.display());
    }

    let json = serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;

    let mut file = File::create(config_path)
        .with_context(|| format!("Failed to create config file: {}", config_path.display()))?;

    file.write_all(json.as_bytes())
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    tracing::debug!("Saved config to: {}", config_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_path_resolution_returns_values() {
        assert!(get_config_dir().is_some());
        assert!(get_config_path().is_some());
        assert!(get_history_path().is_some());
        assert!(get_ssh_dir().is_some());
    }

    #[test]
    fn test_load_creates_default_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sshmark").join("config.json");

        let config = load_config_from(&path).unwrap();

        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_load_accepts_comments() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(
            &path,
            r#"{
                // sort by use count
                "version": 1,
                "default_sort": "frequency",
                /* keep history tidy */
                "prune_history": true
            }"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.default_sort, SortMode::Frequency);
        assert!(config.prune_history);
    }

    #[test]
    fn test_load_rejects_unknown_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"version": 1, "colour": "blue"}"#).unwrap();

        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn test_save_keeps_backup() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        save_config_to(&Config::default(), &path).unwrap();

        let updated = Config {
            default_sort: SortMode::Name,
            ..Config::default()
        };
        save_config_to(&updated, &path).unwrap();

        assert!(temp_dir.path().join("config.json.bak").exists());
        assert_eq!(load_config_from(&path).unwrap(), updated);
    }
}
