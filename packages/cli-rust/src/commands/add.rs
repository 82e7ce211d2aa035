//! sshmark add - Add a new host to the SSH config

use anyhow::{Result, bail};
use clap::Args;
use console::style;
use sshmark_core::host::{add_host, host_exists, parse_ssh_options};
use sshmark_core::HostRecord;

use super::CommandContext;

/// Arguments for add command
#[derive(Args)]
pub struct AddArgs {
    /// Alias for the `Host` line (e.g., "prod-1", "staging")
    pub name: String,

    /// Real hostname or IP address
    pub hostname: String,

    /// SSH username
    #[arg(short, long)]
    pub user: Option<String>,

    /// SSH port (default: 22)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to SSH identity file (private key)
    #[arg(short, long)]
    pub identity_file: Option<String>,

    /// Jump host for ProxyJump
    #[arg(short = 'J', long)]
    pub jump_host: Option<String>,

    /// Tag for organization (can be specified multiple times)
    #[arg(short, long)]
    pub tag: Vec<String>,

    /// Extra config option as Key=Value (can be specified multiple times)
    #[arg(short, long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,

    /// Command to run on the remote host
    #[arg(long)]
    pub command: Option<String>,

    /// RequestTTY mode (yes, no, force, auto)
    #[arg(long)]
    pub tty: Option<String>,
}

/// Build the record described by the arguments
fn record_from_args(args: &AddArgs) -> Result<HostRecord> {
    let mut record = HostRecord::new(&args.name).with_hostname(&args.hostname);

    if let Some(user) = &args.user {
        record = record.with_user(user);
    }
    if let Some(port) = args.port {
        record = record.with_port(port);
    }
    if let Some(key) = &args.identity_file {
        record = record.with_identity_file(key);
    }
    if let Some(jump) = &args.jump_host {
        record = record.with_proxy_jump(jump);
    }
    if let Some(command) = &args.command {
        record = record.with_remote_command(command);
    }
    if let Some(tty) = &args.tty {
        record = record.with_request_tty(tty);
    }
    for tag in &args.tag {
        record = record.with_tag(tag);
    }
    if !args.options.is_empty() {
        record.options = parse_ssh_options(&args.options.join(" "))?;
    }

    Ok(record)
}

pub fn cmd_add(args: &AddArgs, ctx: &CommandContext) -> Result<()> {
    if host_exists(&args.name, &ctx.ssh_config) {
        bail!(
            "Host '{}' already exists in {}. Use 'sshmark edit {}' to change it.",
            args.name,
            ctx.ssh_config.display(),
            args.name
        );
    }

    let record = record_from_args(args)?;
    add_host(&record, &ctx.ssh_config)?;

    if !ctx.quiet {
        println!(
            "{} Host '{}' added ({}).",
            style("Added:").green(),
            style(&args.name).cyan(),
            record.display_target()
        );
        println!(
            "  {} {}",
            style("Connect with:").dim(),
            style(format!("ssh {}", args.name)).yellow()
        );
    }

    Ok(())
}
