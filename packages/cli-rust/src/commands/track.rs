//! sshmark track - Record a connection from ssh-style arguments
//!
//! Meant to be called from a shell wrapper around `ssh`:
//! `sshmark track -- "$@" && ssh "$@"`.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::Args;
use console::style;
use sshmark_core::ManualConnection;
use sshmark_core::history::{is_manual_ssh_command, parse_ssh_args};
use sshmark_core::host::host_exists;

use super::CommandContext;
use crate::output::identifier_style;

/// ssh options that take a separate value
const SSH_FLAGS_WITH_VALUE: &str = "bcDEeFIiJLlmOopQRSWw";

/// Arguments for track command
#[derive(Args)]
pub struct TrackArgs {
    /// Arguments exactly as passed to ssh
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "SSH_ARGS"
    )]
    pub ssh_args: Vec<String>,
}

/// What a set of ssh arguments connects to
#[derive(Debug, PartialEq, Eq)]
enum Tracked {
    Host(String),
    Manual(ManualConnection),
}

/// First argument that is not an option or an option's value
fn first_destination(args: &[String]) -> Option<&str> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(flag) = arg.strip_prefix('-') {
            let takes_value = flag.len() == 1 && SSH_FLAGS_WITH_VALUE.contains(flag);
            if takes_value {
                iter.next();
            }
            continue;
        }
        return Some(arg);
    }
    None
}

/// Config file given with `-F <file>` or `-F<file>`; the last one wins
fn config_file_arg(args: &[String]) -> Option<PathBuf> {
    let mut found = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let Some(flag) = arg.strip_prefix('-') else {
            break;
        };
        if flag == "F" {
            found = iter.next().map(PathBuf::from);
        } else if let Some(path) = flag.strip_prefix('F') {
            found = Some(PathBuf::from(path));
        } else if flag.len() == 1 && SSH_FLAGS_WITH_VALUE.contains(flag) {
            iter.next();
        }
    }
    found
}

/// Decide whether the arguments name a configured host or a manual connection
fn classify(
    args: &[String],
    is_known_host: impl Fn(&str) -> bool,
    default_user: &str,
) -> Option<Tracked> {
    if !is_manual_ssh_command(args) {
        if let Some(name) = first_destination(args) {
            if is_known_host(name) {
                return Some(Tracked::Host(name.to_string()));
            }
        }
    }
    parse_ssh_args(args, default_user).map(Tracked::Manual)
}

/// Classify against the config ssh itself would read
fn resolve(ssh_args: &[String], default_config: &Path, user: &str) -> Option<Tracked> {
    let config_file = config_file_arg(ssh_args).unwrap_or_else(|| default_config.to_path_buf());
    classify(ssh_args, |name| host_exists(name, &config_file), user)
}

pub fn cmd_track(args: &TrackArgs, ctx: &CommandContext) -> Result<()> {
    let user = whoami::username();
    let tracked = resolve(&args.ssh_args, &ctx.ssh_config, &user);

    let mut history = ctx.open_history()?;
    let identifier = match tracked {
        Some(Tracked::Host(name)) => {
            history.record_connection(&name)?;
            name
        }
        Some(Tracked::Manual(conn)) => history.record_manual_connection(&conn)?,
        None => bail!(
            "Could not find a destination in: {}",
            args.ssh_args.join(" ")
        ),
    };

    if !ctx.quiet {
        println!(
            "{} {} ({} connections)",
            style("Tracked:").green(),
            identifier_style(&identifier),
            history.connect_count(&identifier)
        );
    }
    Ok(())
}
