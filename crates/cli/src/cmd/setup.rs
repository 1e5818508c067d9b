//! Setup command implementation
//!
//! Interactive first-run configuration: asks for the vault and output
//! folders, saves the config file and seeds the user template.

use clap::Args;
use owo_colors::OwoColorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::command::Command;
use crate::common::{RuntimeContext, expand_path};
use crate::error::{CommandError, Result};
use crate::ui::{ask_text, confirm};
use obs2html_config::{Config, default_template_file};
use obs2html_core::path::{
    canonicalize_existing_prefix, dir_exists, is_dir_empty, remove_trailing_slash, subdir_exists,
};
use obs2html_engine::template::ensure_user_template;
use obs2html_engine::{PandocConverter, PandocOptions};

/// Folder every Obsidian vault carries
const VAULT_MARKER: &str = ".obsidian";

/// Whether an acceptable output folder already has content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputState {
    /// Missing or holding only OS housekeeping files
    Empty,
    /// Holds other files that a run may overwrite
    NotEmpty,
}

/// Setup command
#[derive(Debug, Default, Args)]
pub struct SetupCommand {
    /// Replace an existing configuration
    #[arg(long)]
    pub force: bool,

    /// Vault folder (skips the prompt)
    #[arg(long, value_name = "DIR")]
    pub vault: Option<PathBuf>,

    /// Output folder (skips the prompt)
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Accept a non-empty output folder without asking
    #[arg(short, long)]
    pub yes: bool,
}

impl Command for SetupCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        if context.config_exists() && !self.force {
            println!(
                "{} Configuration already exists at {}",
                "●".yellow(),
                context.config_path.display().bright_white()
            );
            println!("  Run `obs2html setup --force` to replace it.");
            return Ok(());
        }

        println!("{}", "obs2html setup".bright_white().bold());
        println!("Convert an Obsidian vault into standalone HTML pages.\n");
        warn_if_pandoc_missing();

        let previous = if context.config_exists() {
            context.load_config().ok()
        } else {
            None
        };

        let vault = self.choose_vault(previous.as_ref().and_then(Config::vault_dir))?;
        let output = self.choose_output(&vault, previous.as_ref().and_then(Config::output_dir))?;

        fs::create_dir_all(&output)?;

        let mut config = previous.unwrap_or_default();
        config.general.vault_dir = Some(vault.clone());
        config.general.output_dir = Some(output.clone());
        config
            .save(&context.config_path)
            .map_err(CommandError::config)?;
        info!("Saved configuration to {}", context.config_path.display());

        let template = match config.general.template.clone() {
            Some(template) => template,
            None => {
                let template = default_template_file().ok_or_else(|| {
                    CommandError::Other(anyhow::anyhow!("Could not determine the data directory"))
                })?;
                if ensure_user_template(&template)? {
                    debug!("Seeded user template at {}", template.display());
                }
                template
            }
        };

        println!();
        println!("{} Setup complete", "●".bright_green());
        println!("  {:10} {}", "Vault", vault.display().bright_white());
        println!("  {:10} {}", "Output", output.display().bright_white());
        println!("  {:10} {}", "Template", template.display().bright_white());
        println!("  {:10} {}", "Config", context.config_path.display().bright_white());
        println!();
        println!("Next steps:");
        println!("  • Run {} to convert your vault", "obs2html".bright_cyan());
        println!("  • Edit the template to change how pages look");
        println!("  • Edit the config to exclude folders or notes");

        Ok(())
    }
}

impl SetupCommand {
    fn choose_vault(&self, initial: Option<&PathBuf>) -> Result<PathBuf> {
        if let Some(path) = &self.vault {
            let path = normalize_path_input(&path.to_string_lossy());
            check_vault(&path).map_err(|reason| CommandError::invalid_path(&path, reason))?;
            return Ok(path);
        }

        let initial = initial.map(|p| p.to_string_lossy().into_owned());
        loop {
            let answer = ask_text("Path to your Obsidian vault", initial.as_deref())?;
            let path = normalize_path_input(&answer);
            match check_vault(&path) {
                Ok(()) => return Ok(path),
                Err(reason) => print_rejected(&path, &reason),
            }
        }
    }

    fn choose_output(&self, vault: &Path, initial: Option<&PathBuf>) -> Result<PathBuf> {
        if let Some(path) = &self.output {
            let path = normalize_path_input(&path.to_string_lossy());
            let state =
                check_output(&path, vault).map_err(|reason| CommandError::invalid_path(&path, reason))?;
            if state == OutputState::NotEmpty && !self.yes && !confirm_overwrite(&path)? {
                return Err(CommandError::SetupCancelled);
            }
            return Ok(path);
        }

        let initial = initial.map(|p| p.to_string_lossy().into_owned());
        loop {
            let answer = ask_text("Folder for the generated HTML", initial.as_deref())?;
            let path = normalize_path_input(&answer);
            match check_output(&path, vault) {
                Ok(OutputState::Empty) => return Ok(path),
                Ok(OutputState::NotEmpty) => {
                    if self.yes || confirm_overwrite(&path)? {
                        return Ok(path);
                    }
                }
                Err(reason) => print_rejected(&path, &reason),
            }
        }
    }
}

fn confirm_overwrite(path: &Path) -> Result<bool> {
    confirm(
        &format!(
            "{} is not empty and files in it may be overwritten. Use it anyway?",
            path.display()
        ),
        false,
    )
}

fn print_rejected(path: &Path, reason: &str) {
    eprintln!("{} {}: {reason}", "✗".bright_red(), path.display());
}

fn warn_if_pandoc_missing() {
    if let Err(e) = PandocConverter::locate("pandoc", PandocOptions::default()) {
        println!("{} {e}", "⚠".yellow());
        println!("  You can finish setup now, but converting needs Pandoc.\n");
    }
}

/// Clean up a path typed or dragged into the prompt
pub fn normalize_path_input(input: &str) -> PathBuf {
    expand_path(Path::new(&remove_trailing_slash(input)))
}

/// Check that `path` is an existing Obsidian vault
pub fn check_vault(path: &Path) -> std::result::Result<(), String> {
    if path.as_os_str().is_empty() || !dir_exists(path) {
        return Err("folder does not exist".to_string());
    }
    if !subdir_exists(path, VAULT_MARKER) {
        return Err(format!("not an Obsidian vault (no {VAULT_MARKER} folder)"));
    }
    Ok(())
}

/// Check that `output` can receive the generated site for `vault`
pub fn check_output(output: &Path, vault: &Path) -> std::result::Result<OutputState, String> {
    if output.as_os_str().is_empty() {
        return Err("no folder given".to_string());
    }
    if output.exists() && !output.is_dir() {
        return Err("exists and is not a folder".to_string());
    }

    let vault = fs::canonicalize(vault).unwrap_or_else(|_| vault.to_path_buf());
    let resolved = canonicalize_existing_prefix(output).unwrap_or_else(|_| output.to_path_buf());
    if resolved.starts_with(&vault) {
        return Err("must not be inside the vault".to_string());
    }

    match is_dir_empty(output) {
        Ok(true) => Ok(OutputState::Empty),
        Ok(false) => Ok(OutputState::NotEmpty),
        Err(e) => Err(format!("cannot be read: {e}")),
    }
}
