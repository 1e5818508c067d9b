//! XDG directory utilities
//!
//! This module provides XDG-compliant directory paths for obs2html.
//! It follows the XDG Base Directory specification using the `xdg` crate:
//! - `XDG_CONFIG_HOME` defaults to ~/.config
//! - `XDG_DATA_HOME` defaults to ~/.local/share
//! - `XDG_STATE_HOME` defaults to ~/.local/state

use std::path::PathBuf;
use xdg::BaseDirectories;

const PREFIX: &str = "obs2html";

/// Get the obs2html config directory
///
/// Returns `$XDG_CONFIG_HOME/obs2html` or `~/.config/obs2html`
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    BaseDirectories::with_prefix(PREFIX).get_config_home()
}

/// Get the obs2html data directory (user template lives here)
///
/// Returns `$XDG_DATA_HOME/obs2html` or `~/.local/share/obs2html`
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    BaseDirectories::with_prefix(PREFIX).get_data_home()
}

/// Get the obs2html state directory (error report lives here)
///
/// Returns `$XDG_STATE_HOME/obs2html` or `~/.local/state/obs2html`
#[must_use]
pub fn state_dir() -> Option<PathBuf> {
    BaseDirectories::with_prefix(PREFIX).get_state_home()
}

/// Get the default config file path
#[must_use]
pub fn default_config_file() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Get the default user template path
///
/// Seeded from the bundled template on first run; users edit this copy.
#[must_use]
pub fn default_template_file() -> Option<PathBuf> {
    data_dir().map(|d| d.join("templates").join("user.html"))
}

/// Get the file that per-file failures of the last run are written to
#[must_use]
pub fn error_report_file() -> Option<PathBuf> {
    state_dir().map(|d| d.join("errors.txt"))
}
