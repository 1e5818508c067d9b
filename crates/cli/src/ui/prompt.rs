//! Interactive prompts used by `setup`

use crate::error::{CommandError, Result};
use dialoguer::{Confirm, Input, theme::ColorfulTheme};

/// Ask for a line of text, optionally pre-filled
pub fn ask_text(prompt: &str, initial: Option<&str>) -> Result<String> {
    let theme = ColorfulTheme::default();
    let mut input = Input::<String>::with_theme(&theme).with_prompt(prompt);
    if let Some(initial) = initial {
        input = input.with_initial_text(initial);
    }
    Ok(input.interact_text()?)
}

/// Ask a yes/no question; Esc or `q` cancels setup
pub fn confirm(prompt: &str, default: bool) -> Result<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact_opt()?
        .ok_or(CommandError::SetupCancelled)
}
