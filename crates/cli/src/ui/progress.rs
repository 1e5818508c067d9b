//! Progress bar utilities
//!
//! This module provides progress bar helpers using indicatif.

use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for file conversion
///
/// The message slot shows the file currently being processed.
pub fn create_progress_bar(total: u64, prefix: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{prefix} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {wide_msg}")
            .expect("progress bar template is valid")
            .progress_chars("#>-"),
    );
    pb.set_prefix(prefix.to_string());
    pb
}

/// Create a spinner for indeterminate operations
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .expect("spinner template is valid"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Progress bar when enabled, otherwise a hidden one that ignores updates
pub fn progress_bar_or_hidden(enabled: bool, total: u64, prefix: &str) -> ProgressBar {
    if enabled {
        create_progress_bar(total, prefix)
    } else {
        ProgressBar::hidden()
    }
}
