//! sshmark show - Show details for a host

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use console::style;
use serde::Serialize;
use sshmark_core::host::{format_ssh_options, get_host, is_part_of_multi_host_declaration};
use sshmark_core::history::PortForwardConfig;
use sshmark_core::HostRecord;

use super::CommandContext;
use crate::output::{count_style, format_last_used};

/// Arguments for show command
#[derive(Args)]
pub struct ShowArgs {
    /// Name of the host to show
    pub name: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Host plus its usage, for `--json`
#[derive(Serialize)]
struct HostDetails<'a> {
    #[serde(flatten)]
    host: &'a HostRecord,
    declared_with: Vec<String>,
    connect_count: u32,
    last_connect: Option<String>,
    port_forwarding: Option<&'a PortForwardConfig>,
}

pub fn cmd_show(args: &ShowArgs, ctx: &CommandContext) -> Result<()> {
    let host = get_host(&args.name, &ctx.ssh_config)?;
    let (is_multi, names) = is_part_of_multi_host_declaration(&args.name, &ctx.ssh_config)?;
    let declared_with: Vec<String> = names.into_iter().filter(|n| n != &args.name).collect();
    let history = ctx.open_history()?;

    let count = history.connect_count(&host.name);
    let last = history.last_connect(&host.name);
    let forwarding = history.port_forwarding_for(&host.name);

    if args.json || ctx.quiet {
        let details = HostDetails {
            host: &host,
            declared_with,
            connect_count: count,
            last_connect: last.map(|t| t.to_rfc3339()),
            port_forwarding: forwarding,
        };
        println!("{}", serde_json::to_string_pretty(&details)?);
        return Ok(());
    }

    println!("{}", style(&host.name).cyan().bold());
    if is_multi {
        println!(
            "  {} declared together with {}",
            style("*").yellow(),
            declared_with.join(", ")
        );
    }
    println!();

    let none = style("(not set)").dim().to_string();
    println!(
        "  {:<15} {}",
        style("Hostname:").dim(),
        host.hostname.as_deref().unwrap_or(&none)
    );
    println!(
        "  {:<15} {}",
        style("User:").dim(),
        host.user.as_deref().unwrap_or(&none)
    );
    println!(
        "  {:<15} {}",
        style("Port:").dim(),
        host.port
            .map(|p| p.to_string())
            .unwrap_or_else(|| "22 (default)".to_string())
    );

    if let Some(key) = &host.identity_file {
        println!("  {:<15} {}", style("Identity:").dim(), key);
    }
    if let Some(jump) = &host.proxy_jump {
        println!("  {:<15} {}", style("Jump host:").dim(), jump);
    }
    if let Some(command) = &host.remote_command {
        println!("  {:<15} {}", style("Command:").dim(), command);
    }
    if let Some(tty) = &host.request_tty {
        println!("  {:<15} {}", style("RequestTTY:").dim(), tty);
    }
    if !host.options.is_empty() {
        println!(
            "  {:<15} {}",
            style("Options:").dim(),
            format_ssh_options(&host.options)
        );
    }
    if !host.tags.is_empty() {
        println!("  {:<15} {}", style("Tags:").dim(), host.tags.join(", "));
    }

    println!();
    println!("  {:<15} {}", style("Connections:").dim(), count_style(count));
    println!(
        "  {:<15} {}",
        style("Last used:").dim(),
        format_last_used(last, Utc::now())
    );
    if let Some(forwarding) = forwarding {
        println!(
            "  {:<15} {}",
            style("Forwarding:").dim(),
            forwarding.to_ssh_args().join(" ")
        );
    }

    println!();
    println!(
        "  {} {}",
        style("Connect:").dim(),
        style(format!("ssh {}", host.name)).yellow()
    );

    Ok(())
}
