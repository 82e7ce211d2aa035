//! Config path subcommand

use anyhow::Result;
use console::style;
use sshmark_core::config::paths::get_history_path;

use crate::commands::CommandContext;

/// Print the settings, SSH config and history file locations
///
/// In quiet mode only the SSH config path is printed, for scripting.
pub fn cmd_config_path(ctx: &CommandContext) -> Result<()> {
    if ctx.quiet {
        println!("{}", ctx.ssh_config.display());
        return Ok(());
    }

    let history = get_history_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("  {:<12} {}", style("Settings:").dim(), ctx.settings_path.display());
    println!("  {:<12} {}", style("SSH config:").dim(), ctx.ssh_config.display());
    println!("  {:<12} {}", style("History:").dim(), history);
    Ok(())
}
