//! Config show subcommand
//!
//! Displays current settings in table or JSON format.

use anyhow::Result;
use comfy_table::{Cell, Color, Table};
use sshmark_core::Config;

use crate::commands::CommandContext;

/// Show current settings
///
/// The `ssh_config` row shows the file actually in use, which may come from
/// `--config` rather than the settings file.
pub fn cmd_config_show(ctx: &CommandContext, json: bool) -> Result<()> {
    let config = &ctx.settings;

    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Key", "Value"]);

    table.add_row(vec![
        Cell::new("version"),
        Cell::new(config.version.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("ssh_config"),
        format_ssh_config(config, &ctx.ssh_config.display().to_string()),
    ]);
    table.add_row(vec![
        Cell::new("default_sort"),
        Cell::new(config.default_sort.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("prune_history"),
        Cell::new(config.prune_history.to_string()),
    ]);

    println!("{table}");
    println!();
    println!("Config file: {}", ctx.settings_path.display());

    Ok(())
}

/// Show the effective SSH config, highlighted when it is not the configured one
fn format_ssh_config(config: &Config, effective: &str) -> Cell {
    let configured = config
        .ssh_config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    if configured == effective {
        Cell::new(effective)
    } else {
        Cell::new(format!("{effective} (from --config)")).fg(Color::Yellow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ssh_config_matches_settings() {
        let config = Config {
            ssh_config: Some("/tmp/ssh_config".to_string()),
            ..Config::default()
        };
        let cell = format_ssh_config(&config, "/tmp/ssh_config");
        assert_eq!(cell.content(), "/tmp/ssh_config");
    }

    #[test]
    fn test_format_ssh_config_marks_override() {
        let config = Config {
            ssh_config: Some("/tmp/ssh_config".to_string()),
            ..Config::default()
        };
        let cell = format_ssh_config(&config, "/tmp/other");
        assert_eq!(cell.content(), "/tmp/other (from --config)");
    }
}
