//! CLI command implementations
//!
//! Host commands work on the SSH config chosen in [`CommandContext`];
//! history commands work on the per-user history file.

mod add;
mod config;
mod edit;
mod forward;
mod history;
mod list;
mod promote;
mod rm;
mod show;
mod track;

use std::path::PathBuf;

use anyhow::{Context, Result};
use sshmark_core::host::parse_all;
use sshmark_core::{Config, HistoryStore, HostRecord};

pub use add::{AddArgs, cmd_add};
pub use config::{ConfigArgs, cmd_config};
pub use edit::{EditArgs, cmd_edit};
pub use forward::{ForwardArgs, cmd_forward};
pub use history::{HistoryArgs, cmd_history};
pub use list::{ListArgs, cmd_list};
pub use promote::{PromoteArgs, cmd_promote};
pub use rm::{RmArgs, cmd_rm};
pub use show::{ShowArgs, cmd_show};
pub use track::{TrackArgs, cmd_track};

/// State shared by every command
pub struct CommandContext {
    /// Loaded sshmark settings
    pub settings: Config,
    /// Where the settings were loaded from
    pub settings_path: PathBuf,
    /// SSH config file to read and rewrite
    pub ssh_config: PathBuf,
    pub quiet: bool,
}

impl CommandContext {
    /// Hosts in the SSH config; a missing file has none
    pub fn load_hosts(&self) -> Result<Vec<HostRecord>> {
        if !self.ssh_config.exists() {
            tracing::debug!("No SSH config at {}", self.ssh_config.display());
            return Ok(Vec::new());
        }
        parse_all(&self.ssh_config)
            .with_context(|| format!("Failed to read {}", self.ssh_config.display()))
    }

    /// Open the connection history
    pub fn open_history(&self) -> Result<HistoryStore> {
        HistoryStore::open().context("Failed to open connection history")
    }

    /// Whether the SSH config is the default one, so `ssh` needs no `-F`
    pub fn uses_default_ssh_config(&self) -> bool {
        sshmark_core::host::get_ssh_config_path().as_deref() == Some(self.ssh_config.as_path())
    }
}
