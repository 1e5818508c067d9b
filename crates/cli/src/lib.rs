//! obs2html CLI library
//!
//! This library contains all the CLI logic for obs2html, making it reusable
//! for testing and integration with other tools.

pub mod cmd;
pub mod command;
pub mod common;
pub mod error;
pub mod stats;
pub mod ui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use command::Command;
use common::RuntimeContext;

/// obs2html - Publish an Obsidian vault as a static HTML site
#[derive(Parser)]
#[command(name = "obs2html")]
#[command(about = "Convert an Obsidian vault into a folder of HTML pages")]
#[command(version)]
#[command(long_about = "Convert an Obsidian vault into a folder of HTML pages

Notes are rewritten from Obsidian syntax to standard Markdown and rendered
with Pandoc. Everything else in the vault is copied as-is, so the output
mirrors the vault's folder structure.

Running obs2html without a subcommand converts the configured vault, or
starts the setup wizard when no configuration exists yet.

Examples:
  • obs2html setup
      → Choose a vault and an output folder

  • obs2html
      → Convert using the saved configuration

  • obs2html info --json
      → Show configuration and Pandoc details")]
pub struct Cli {
    /// Path to the config file
    #[arg(long, env = "OBS2HTML_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (shows DEBUG level logs)
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to a file (useful for debugging)
    #[arg(long, env = "OBS2HTML_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for obs2html CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Choose the vault and output folders and save them
    Setup(cmd::setup::SetupCommand),

    /// Convert the configured vault to HTML
    Convert(cmd::convert::ConvertCommand),

    /// Display configuration, build and Pandoc information
    Info(cmd::info::InfoCommand),
}

/// Execute the command based on the command type
fn execute_command(command: Commands, context: &RuntimeContext) -> Result<()> {
    match command {
        Commands::Setup(setup_cmd) => setup_cmd.execute(context)?,
        Commands::Convert(convert_cmd) => {
            convert_cmd.execute(context)?;
        }
        Commands::Info(info_cmd) => info_cmd.execute(context)?,
    }
    Ok(())
}

/// Pick the command to run when none was given
///
/// First run goes through setup, later runs convert.
fn default_command(context: &RuntimeContext) -> Commands {
    if context.config_exists() {
        Commands::Convert(cmd::convert::ConvertCommand::default())
    } else {
        Commands::Setup(cmd::setup::SetupCommand::default())
    }
}

/// Main entry point for the CLI logic
///
/// # Errors
///
/// Returns an error if:
/// - Logging initialization fails
/// - The configuration path cannot be determined
/// - Command execution fails
pub fn run(cli: Cli) -> Result<()> {
    obs2html_config::logging::init(cli.verbose, cli.log_file.as_deref())?;

    let config_path = common::resolve_config_path(cli.config.as_deref())?;
    debug!(config = %config_path.display(), "Using configuration file");
    let context = RuntimeContext::new(config_path);

    let command = match cli.command {
        Some(command) => command,
        None => default_command(&context),
    };
    execute_command(command, &context)
}
