//! Config subcommand implementations
//!
//! Provides `sshmark config` subcommands for viewing settings.

mod path;
mod show;

use anyhow::Result;
use clap::{Args, Subcommand};

use super::CommandContext;

pub use path::cmd_config_path;
pub use show::cmd_config_show;

/// Configuration command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Output as JSON instead of table format
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Show current settings
    Show {
        /// Output as JSON instead of table format
        #[arg(long)]
        json: bool,
    },
    /// Print the files sshmark reads and writes
    Path,
}

/// Handle config command
///
/// If no subcommand is given, defaults to Show.
pub fn cmd_config(args: ConfigArgs, ctx: &CommandContext) -> Result<()> {
    match args.command {
        Some(ConfigSubcommands::Show { json }) => cmd_config_show(ctx, json || args.json),
        Some(ConfigSubcommands::Path) => cmd_config_path(ctx),
        None => cmd_config_show(ctx, args.json),
    }
}
