//! sshmark edit - Edit a host in the SSH config
//!
//! Field changes on a host that shares its `Host` line apply to every name
//! on that line. `--names` replaces the line's name list, which renames,
//! groups or splits hosts in one write.

use anyhow::Result;
use clap::Args;
use console::style;
use sshmark_core::HostRecord;
use sshmark_core::host::{
    get_host, is_part_of_multi_host_declaration, update_host, update_multi_host_block,
};

use super::CommandContext;

/// Arguments for edit command
#[derive(Args)]
pub struct EditArgs {
    /// Name of the host to edit
    pub name: String,

    /// New hostname
    #[arg(long)]
    pub hostname: Option<String>,

    /// New SSH username (use empty string to clear)
    #[arg(short, long)]
    pub user: Option<String>,

    /// New SSH port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// New identity file path (use empty string to clear)
    #[arg(short, long)]
    pub identity_file: Option<String>,

    /// New jump host (use empty string to clear)
    #[arg(short = 'J', long)]
    pub jump_host: Option<String>,

    /// New remote command (use empty string to clear)
    #[arg(long)]
    pub command: Option<String>,

    /// New RequestTTY mode (use empty string to clear)
    #[arg(long)]
    pub tty: Option<String>,

    /// Add a tag
    #[arg(long)]
    pub add_tag: Vec<String>,

    /// Remove a tag
    #[arg(long)]
    pub remove_tag: Vec<String>,

    /// Replace the names on the host's `Host` line (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "NAME,...")]
    pub names: Option<Vec<String>>,
}

/// Set or clear an optional field; returns whether it was touched
fn set_optional(field: &mut Option<String>, value: Option<&String>) -> bool {
    match value {
        Some(v) if v.is_empty() => {
            *field = None;
            true
        }
        Some(v) => {
            *field = Some(v.clone());
            true
        }
        None => false,
    }
}

/// Apply the field edits to a copy of `record`
///
/// Returns the edited record and whether anything was requested.
fn apply_edits(record: &HostRecord, args: &EditArgs) -> (HostRecord, bool) {
    let mut updated = record.clone();
    let mut changed = false;

    if let Some(hostname) = &args.hostname {
        updated.hostname = Some(hostname.clone());
        changed = true;
    }
    if let Some(port) = args.port {
        updated.port = Some(port);
        changed = true;
    }
    changed |= set_optional(&mut updated.user, args.user.as_ref());
    changed |= set_optional(&mut updated.identity_file, args.identity_file.as_ref());
    changed |= set_optional(&mut updated.proxy_jump, args.jump_host.as_ref());
    changed |= set_optional(&mut updated.remote_command, args.command.as_ref());
    changed |= set_optional(&mut updated.request_tty, args.tty.as_ref());

    for tag in &args.add_tag {
        if !updated.has_tag(tag) {
            updated.tags.push(tag.clone());
            changed = true;
        }
    }
    for tag in &args.remove_tag {
        let before = updated.tags.len();
        updated.tags.retain(|t| !t.eq_ignore_ascii_case(tag));
        changed |= updated.tags.len() != before;
    }

    (updated, changed)
}

pub fn cmd_edit(args: &EditArgs, ctx: &CommandContext) -> Result<()> {
    let current = get_host(&args.name, &ctx.ssh_config)?;
    let (is_multi, names) = is_part_of_multi_host_declaration(&args.name, &ctx.ssh_config)?;
    let (updated, changed) = apply_edits(&current, args);

    let new_names = match &args.names {
        Some(new_names) => new_names
            .iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect(),
        None if changed => names.clone(),
        None => {
            if !ctx.quiet {
                println!("No changes specified. Use --help to see available options.");
            }
            return Ok(());
        }
    };

    if is_multi || args.names.is_some() {
        update_multi_host_block(&names, &new_names, &updated, &ctx.ssh_config)?;
    } else {
        update_host(&args.name, &updated, &ctx.ssh_config)?;
    }

    if !ctx.quiet {
        if new_names != names {
            println!(
                "{} Host line changed: {} -> {}",
                style("Updated:").green(),
                style(names.join(" ")).dim(),
                style(new_names.join(" ")).cyan()
            );
        } else if is_multi {
            println!(
                "{} Hosts {} updated.",
                style("Updated:").green(),
                style(names.join(", ")).cyan()
            );
        } else {
            println!(
                "{} Host '{}' updated.",
                style("Updated:").green(),
                style(&args.name).cyan()
            );
        }
        if let Some(first) = new_names.first() {
            println!(
                "  {} {}",
                style("View changes:").dim(),
                style(format!("sshmark show {first}")).yellow()
            );
        }
    }

    Ok(())
}
