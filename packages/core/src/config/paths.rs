//! Path resolution for sshmark
//!
//! Settings and history live in an XDG-style directory on every Unix:
//! - Linux/macOS: `~/.config/sshmark/`
//! - Windows: `%APPDATA%\sshmark\`
//!
//! SSH's own files are always under `~/.ssh/`.

use std::path::PathBuf;

/// Get the configuration directory path
pub fn get_config_dir() -> Option<PathBuf> {
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    {
        directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(".config").join("sshmark"))
    }
    #[cfg(target_os = "windows")]
    {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().to_path_buf())
            .map(|d| d.join("sshmark"))
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        None
    }
}

/// Get the full path to the settings file
///
/// Returns: `{config_dir}/config.json`
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|d| d.join("config.json"))
}

/// Get the full path to the connection history file
///
/// Returns: `{config_dir}/history.json`
pub fn get_history_path() -> Option<PathBuf> {
    get_config_dir().map(|d| d.join("history.json"))
}

/// Get the user's SSH directory (`~/.ssh`)
pub fn get_ssh_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ssh"))
}

/// Where older releases kept the history
///
/// Returns: `~/.ssh/sshmark_history.json`
pub fn get_legacy_history_path() -> Option<PathBuf> {
    get_ssh_dir().map(|d| d.join("sshmark_history.json"))
}
