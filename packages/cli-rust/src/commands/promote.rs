//! sshmark promote - Turn a manual connection into a named host

use anyhow::{Result, bail};
use clap::Args;
use console::style;
use sshmark_core::history::promote;
use sshmark_core::host::{add_host, host_exists};

use super::CommandContext;

/// Arguments for promote command
#[derive(Args)]
pub struct PromoteArgs {
    /// Manual identifier from `sshmark history` (manual:user@host:port)
    pub identifier: String,

    /// Name for the new `Host` entry
    pub name: String,

    /// Tag for organization (can be specified multiple times)
    #[arg(short, long)]
    pub tag: Vec<String>,
}

pub fn cmd_promote(args: &PromoteArgs, ctx: &CommandContext) -> Result<()> {
    if host_exists(&args.name, &ctx.ssh_config) {
        bail!(
            "Host '{}' already exists in {}. Choose a different name.",
            args.name,
            ctx.ssh_config.display()
        );
    }

    let mut record = promote(&args.identifier, &args.name)?;
    for tag in &args.tag {
        record = record.with_tag(tag);
    }
    add_host(&record, &ctx.ssh_config)?;

    if !ctx.quiet {
        println!(
            "{} Host '{}' added ({}).",
            style("Promoted:").green(),
            style(&args.name).cyan(),
            record.display_target()
        );
        println!(
            "  {} Identity files are not part of manual identifiers; add one with {}",
            style("Note:").dim(),
            style(format!("sshmark edit {} -i <path>", args.name)).yellow()
        );
    }
    Ok(())
}
