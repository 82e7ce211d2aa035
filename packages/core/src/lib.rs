//! sshmark-core - Core library for sshmark
//!
//! Manages hosts in an SSH client config file (including multi-host
//! `Host` declarations), and tracks connection history for both named
//! hosts and ad-hoc `user@host:port` connections.

pub mod config;
pub mod history;
pub mod host;
pub mod version;

// Re-export commonly used types for Rust consumers
pub use config::{Config, SortMode, load_config, save_config};
pub use history::{HistoryError, HistoryStore, ManualConnection};
pub use host::{ConfigError, HostRecord};
pub use version::{get_version, get_version_long};
