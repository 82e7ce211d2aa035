//! History forget subcommand

use anyhow::{Result, bail};
use console::style;
use sshmark_core::HistoryError;

use crate::commands::CommandContext;

/// Remove one entry from the history
pub fn cmd_history_forget(identifier: &str, ctx: &CommandContext) -> Result<()> {
    let mut history = ctx.open_history()?;

    match history.remove_connection(identifier) {
        Ok(()) => {}
        Err(HistoryError::NotFound(_)) => {
            bail!(
                "No history for '{}'. Run 'sshmark history' to see recorded connections.",
                identifier
            );
        }
        Err(e) => return Err(e.into()),
    }

    if !ctx.quiet {
        println!(
            "{} Forgot {}.",
            style("Removed:").green(),
            style(identifier).cyan()
        );
    }
    Ok(())
}
