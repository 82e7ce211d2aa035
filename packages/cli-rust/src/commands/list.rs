//! sshmark list - List hosts from the SSH config

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use comfy_table::{Cell, Color, Table};
use console::style;
use sshmark_core::{HistoryStore, HostRecord, SortMode};

use super::CommandContext;
use crate::output::{format_last_used, tag_list};

/// Arguments for list command
#[derive(Args)]
pub struct ListArgs {
    /// Sort order: recency, frequency or name (default: from settings)
    #[arg(short, long)]
    pub sort: Option<SortMode>,

    /// Only hosts carrying this tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Show only host names (for scripting)
    #[arg(long)]
    pub names_only: bool,
}

pub fn cmd_list(args: &ListArgs, ctx: &CommandContext) -> Result<()> {
    let hosts = ctx.load_hosts()?;
    let mut history = ctx.open_history()?;

    if ctx.settings.prune_history {
        let removed = history.prune(&hosts)?;
        tracing::debug!("Pruned {} history entries for removed hosts", removed);
    }

    if hosts.is_empty() {
        if !ctx.quiet && !args.names_only {
            println!("No hosts configured in {}.", ctx.ssh_config.display());
            println!();
            println!(
                "  {} {}",
                style("Add one with:").dim(),
                style("sshmark add <name> <hostname>").yellow()
            );
        }
        return Ok(());
    }

    let filtered = filter_by_tag(hosts, args.tag.as_deref());
    if filtered.is_empty() {
        if !ctx.quiet && !args.names_only {
            println!(
                "No hosts tagged '{}'.",
                args.tag.as_deref().unwrap_or_default()
            );
        }
        return Ok(());
    }

    let sort = args.sort.unwrap_or(ctx.settings.default_sort);
    let sorted = sort_hosts(&history, &filtered, sort);

    // Names only mode (for scripting)
    if args.names_only || ctx.quiet {
        for host in &sorted {
            println!("{}", host.name);
        }
        return Ok(());
    }

    let now = Utc::now();
    let mut table = Table::new();
    table.set_header(vec!["Name", "Target", "Tags", "Uses", "Last used"]);

    for host in &sorted {
        let count = history.connect_count(&host.name);
        let uses = if count == 0 {
            Cell::new("-").fg(Color::DarkGrey)
        } else {
            Cell::new(count)
        };
        table.add_row(vec![
            Cell::new(&host.name).fg(Color::Cyan),
            Cell::new(host.display_target()),
            Cell::new(tag_list(&host.tags)),
            uses,
            Cell::new(format_last_used(history.last_connect(&host.name), now)),
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} {}",
        style("Config file:").dim(),
        style(ctx.ssh_config.display()).dim()
    );

    Ok(())
}

fn filter_by_tag(hosts: Vec<HostRecord>, tag: Option<&str>) -> Vec<HostRecord> {
    match tag {
        Some(tag) => hosts.into_iter().filter(|h| h.has_tag(tag)).collect(),
        None => hosts,
    }
}

fn sort_hosts(history: &HistoryStore, hosts: &[HostRecord], sort: SortMode) -> Vec<HostRecord> {
    match sort {
        SortMode::Recency => history.sort_by_recency(hosts),
        SortMode::Frequency => history.sort_by_frequency(hosts),
        SortMode::Name => {
            let mut sorted = hosts.to_vec();
            sorted.sort_by(|a, b| a.name.cmp(&b.name));
            sorted
        }
    }
}
