//! Configuration management for obs2html
//!
//! This crate handles:
//! - Configuration loading, saving and validation
//! - XDG directory management
//! - Logging initialization

pub mod config;
pub mod dirs;
pub mod logging;

// Re-export error types from core
pub use obs2html_core::{Error, Result};

// Re-export main types
pub use config::{
    Config, ConvertConfig, DEFAULT_EXCLUDED_FOLDERS, ExcludeConfig, GeneralConfig, ValidatedPaths,
};
pub use dirs::{
    config_dir, data_dir, default_config_file, default_template_file, error_report_file, state_dir,
};
