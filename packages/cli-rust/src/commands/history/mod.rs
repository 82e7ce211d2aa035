//! History subcommand implementations
//!
//! Provides `sshmark history` subcommands for viewing and cleaning up the
//! connection history.

mod forget;
mod prune;
mod show;

use anyhow::Result;
use clap::{Args, Subcommand};

use super::CommandContext;

pub use forget::cmd_history_forget;
pub use prune::cmd_history_prune;
pub use show::cmd_history_show;

/// History command arguments
#[derive(Args)]
pub struct HistoryArgs {
    /// Only entries whose name, user or hostname contains this text
    #[arg(short, long)]
    search: Option<String>,

    /// Output as JSON instead of table format
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<HistorySubcommands>,
}

/// History management subcommands
#[derive(Subcommand)]
pub enum HistorySubcommands {
    /// Forget a single host or manual connection
    Forget {
        /// Host name or manual identifier (manual:user@host:port)
        identifier: String,
    },
    /// Drop history for hosts no longer in the SSH config
    Prune,
}

/// Handle history command
///
/// Without a subcommand, shows the history.
pub fn cmd_history(args: HistoryArgs, ctx: &CommandContext) -> Result<()> {
    match args.command {
        Some(HistorySubcommands::Forget { identifier }) => cmd_history_forget(&identifier, ctx),
        Some(HistorySubcommands::Prune) => cmd_history_prune(ctx),
        None => cmd_history_show(args.search.as_deref(), args.json, ctx),
    }
}
