//! History prune subcommand

use anyhow::Result;
use console::style;

use crate::commands::CommandContext;

/// Drop entries for hosts that are gone from the SSH config
///
/// Manual connections are never pruned.
pub fn cmd_history_prune(ctx: &CommandContext) -> Result<()> {
    let hosts = ctx.load_hosts()?;
    let mut history = ctx.open_history()?;
    let removed = history.prune(&hosts)?;

    if !ctx.quiet {
        if removed == 0 {
            println!("History is already clean.");
        } else {
            println!(
                "{} Removed {} stale {}.",
                style("Pruned:").green(),
                removed,
                if removed == 1 { "entry" } else { "entries" }
            );
        }
    }
    Ok(())
}
