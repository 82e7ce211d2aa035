//! sshmark rm - Remove a host block from the SSH config

use anyhow::Result;
use clap::Args;
use console::style;
use dialoguer::Confirm;
use sshmark_core::HistoryError;
use sshmark_core::host::{delete_host, is_part_of_multi_host_declaration};

use super::CommandContext;

/// Arguments for rm command
#[derive(Args)]
pub struct RmArgs {
    /// Name of the host to remove
    pub name: String,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

pub fn cmd_rm(args: &RmArgs, ctx: &CommandContext) -> Result<()> {
    let (is_multi, names) = is_part_of_multi_host_declaration(&args.name, &ctx.ssh_config)?;

    if !args.force {
        if is_multi {
            let others: Vec<&str> = names
                .iter()
                .map(String::as_str)
                .filter(|n| *n != args.name)
                .collect();
            println!(
                "{} '{}' is declared together with {}; the whole block will be removed.",
                style("Note:").yellow(),
                args.name,
                others.join(", ")
            );
            println!(
                "  {} To drop only this name use: {}",
                style("Tip:").dim(),
                style(format!(
                    "sshmark edit {} --names {}",
                    args.name,
                    others.join(",")
                ))
                .yellow()
            );
        }

        let confirm = Confirm::new()
            .with_prompt(format!("Remove host '{}'?", args.name))
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirm {
            if !ctx.quiet {
                println!("Cancelled.");
            }
            return Ok(());
        }
    }

    delete_host(&args.name, &ctx.ssh_config)?;

    // Forget history for every name that went with the block
    let mut history = ctx.open_history()?;
    for name in &names {
        match history.remove_connection(name) {
            Ok(()) | Err(HistoryError::NotFound(_)) => {}
            Err(e) => tracing::warn!("Failed to forget history for {}: {}", name, e),
        }
    }

    if !ctx.quiet {
        println!(
            "{} Removed {} from {}.",
            style("Removed:").green(),
            style(names.join(", ")).cyan(),
            ctx.ssh_config.display()
        );
    }

    Ok(())
}
