//! sshmark CLI - Manage SSH config hosts and connection history
//!
//! This module contains the CLI implementation used by the `sshmark` binary.

mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use sshmark_core::{config, get_version, get_version_long, load_config};
use tracing_subscriber::EnvFilter;

use commands::CommandContext;

/// Bookmark, edit and track the hosts in your SSH config
#[derive(Parser)]
#[command(name = "sshmark")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bookmark, edit and track the hosts in your SSH config", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Increase verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// SSH config file to manage (default: from settings, then ~/.ssh/config)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List hosts from the SSH config
    #[command(alias = "ls")]
    List(commands::ListArgs),
    /// Show details for a host
    Show(commands::ShowArgs),
    /// Add a host to the SSH config
    Add(commands::AddArgs),
    /// Edit a host, or regroup a multi-host declaration
    Edit(commands::EditArgs),
    /// Remove a host block from the SSH config
    #[command(alias = "remove")]
    Rm(commands::RmArgs),
    /// Show or manage connection history
    History(commands::HistoryArgs),
    /// Record a connection made with the given ssh arguments
    Track(commands::TrackArgs),
    /// Record port forwarding used with a connection
    Forward(commands::ForwardArgs),
    /// Add a manual connection to the SSH config as a named host
    Promote(commands::PromoteArgs),
    /// Show sshmark settings
    Config(commands::ConfigArgs),
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` takes precedence over the verbosity flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    // Configure color output
    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    // Load settings (creates default if missing)
    let settings_path = config::paths::get_config_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

    let settings = match load_config() {
        Ok(settings) => settings,
        Err(e) => {
            // Display rich error for invalid settings
            eprintln!("{} Configuration error", style("Error:").red().bold());
            eprintln!();
            eprintln!("  {:#}", e);
            eprintln!();
            eprintln!("  Config file: {}", style(settings_path.display()).yellow());
            eprintln!();
            eprintln!(
                "  {} Check the config file for syntax errors or unknown fields.",
                style("Tip:").cyan()
            );
            std::process::exit(1);
        }
    };

    let ssh_config = match cli.config.clone() {
        Some(path) => path,
        None => settings
            .ssh_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine SSH config path"))?,
    };

    if cli.verbose > 0 {
        eprintln!(
            "{} sshmark {}",
            style("[info]").cyan(),
            get_version_long()
        );
        eprintln!(
            "{} Settings: {}",
            style("[info]").cyan(),
            settings_path.display()
        );
        eprintln!(
            "{} SSH config: {}",
            style("[info]").cyan(),
            ssh_config.display()
        );
    }

    let ctx = CommandContext {
        settings,
        settings_path,
        ssh_config,
        quiet: cli.quiet,
    };

    match cli.command {
        Some(Commands::List(args)) => commands::cmd_list(&args, &ctx),
        Some(Commands::Show(args)) => commands::cmd_show(&args, &ctx),
        Some(Commands::Add(args)) => commands::cmd_add(&args, &ctx),
        Some(Commands::Edit(args)) => commands::cmd_edit(&args, &ctx),
        Some(Commands::Rm(args)) => commands::cmd_rm(&args, &ctx),
        Some(Commands::History(args)) => commands::cmd_history(args, &ctx),
        Some(Commands::Track(args)) => commands::cmd_track(&args, &ctx),
        Some(Commands::Forward(args)) => commands::cmd_forward(&args, &ctx),
        Some(Commands::Promote(args)) => commands::cmd_promote(&args, &ctx),
        Some(Commands::Config(args)) => commands::cmd_config(args, &ctx),
        None => {
            // No command - show a welcome message and hint to use --help
            if !cli.quiet {
                println!(
                    "{} {}",
                    style("sshmark").cyan().bold(),
                    style(get_version()).dim()
                );
                println!();
                println!("Run {} for available commands.", style("--help").green());
            }
            Ok(())
        }
    }
}
