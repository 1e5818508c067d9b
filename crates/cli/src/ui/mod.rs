//! Terminal UI components
//!
//! - Progress indicators
//! - Setup prompts

pub mod progress;
pub mod prompt;

pub use progress::{create_progress_bar, create_spinner, progress_bar_or_hidden};
pub use prompt::{ask_text, confirm};
