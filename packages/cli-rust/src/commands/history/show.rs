//! History show subcommand
//!
//! Displays recorded connections, most recent first.

use anyhow::Result;
use chrono::Utc;
use comfy_table::{Cell, Color, Table};
use console::style;
use sshmark_core::history::ConnectionInfo;

use crate::commands::CommandContext;
use crate::output::{format_last_used, identifier_color};

/// Show the connection history, optionally filtered
pub fn cmd_history_show(search: Option<&str>, json: bool, ctx: &CommandContext) -> Result<()> {
    let history = ctx.open_history()?;
    let entries = history.search(search.unwrap_or_default());

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        if !ctx.quiet {
            match search {
                Some(term) if !term.is_empty() => println!("No connections match '{term}'."),
                _ => println!("No connections recorded yet."),
            }
        }
        return Ok(());
    }

    if ctx.quiet {
        for entry in &entries {
            println!("{}", entry.identifier);
        }
        return Ok(());
    }

    let config_file = (!ctx.uses_default_ssh_config()).then_some(ctx.ssh_config.as_path());
    let now = Utc::now();

    let mut table = Table::new();
    table.set_header(vec!["Connection", "Uses", "Last used", "Forwarding", "Reconnect"]);

    for entry in &entries {
        let reconnect = history
            .ssh_args_for(&entry.identifier, config_file)
            .map(|args| format!("ssh {}", args.join(" ")))
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            Cell::new(&entry.identifier).fg(identifier_color(&entry.identifier)),
            Cell::new(entry.connect_count).fg(Color::Green),
            Cell::new(format_last_used(Some(entry.last_connect), now)),
            Cell::new(forwarding_summary(entry)),
            Cell::new(reconnect),
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} {}",
        style("History file:").dim(),
        style(history.path().display()).dim()
    );

    Ok(())
}

fn forwarding_summary(entry: &ConnectionInfo) -> String {
    entry
        .port_forwarding
        .as_ref()
        .map(|pf| pf.to_ssh_args().join(" "))
        .unwrap_or_else(|| "-".to_string())
}
