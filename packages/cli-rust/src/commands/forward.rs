//! sshmark forward - Record port forwarding used with a connection

use anyhow::Result;
use clap::Args;
use console::style;

use super::CommandContext;
use crate::output::identifier_style;

/// Arguments for forward command
#[derive(Args)]
pub struct ForwardArgs {
    /// Host name or manual identifier (manual:user@host:port)
    pub identifier: String,

    /// Forwarding type: local, remote or dynamic
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub forward_type: String,

    /// Local port
    #[arg(short, long)]
    pub local_port: String,

    /// Remote host (local and remote forwarding)
    #[arg(long, default_value = "")]
    pub remote_host: String,

    /// Remote port (local and remote forwarding)
    #[arg(long, default_value = "")]
    pub remote_port: String,

    /// Bind address for the listening side
    #[arg(short, long = "bind", default_value = "")]
    pub bind_address: String,
}

pub fn cmd_forward(args: &ForwardArgs, ctx: &CommandContext) -> Result<()> {
    let mut history = ctx.open_history()?;
    history.record_port_forwarding(
        &args.identifier,
        &args.forward_type,
        &args.local_port,
        &args.remote_host,
        &args.remote_port,
        &args.bind_address,
    )?;

    if !ctx.quiet {
        let flags = history
            .port_forwarding_for(&args.identifier)
            .map(|pf| pf.to_ssh_args().join(" "))
            .unwrap_or_default();
        println!(
            "{} {} {}",
            style("Recorded:").green(),
            identifier_style(&args.identifier),
            style(flags).yellow()
        );
    }
    Ok(())
}
