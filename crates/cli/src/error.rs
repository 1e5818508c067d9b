//! Error types for CLI commands
//!
//! Structured errors for the failures a user can act on; anything else is
//! carried through `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during command execution
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CommandError {
    /// Some files could not be converted
    #[error("Conversion failed: {failed} out of {total} files")]
    ConversionFailed {
        /// Number of files that failed
        failed: usize,
        /// Total number of files handled
        total: usize,
    },

    /// The user backed out of setup
    #[error("Setup cancelled")]
    SetupCancelled,

    /// A path given to setup cannot be used
    #[error("Invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The rejected path
        path: PathBuf,
        /// Why it was rejected
        reason: String,
    },

    /// No configuration file yet
    #[error("No configuration found at {}. Run `obs2html setup` first.", .0.display())]
    NotConfigured(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<obs2html_core::Error> for CommandError {
    fn from(err: obs2html_core::Error) -> Self {
        Self::Other(err.into())
    }
}

impl From<obs2html_engine::Error> for CommandError {
    fn from(err: obs2html_engine::Error) -> Self {
        Self::Other(err.into())
    }
}

impl From<dialoguer::Error> for CommandError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Other(anyhow::Error::new(err).context("Failed to read input"))
    }
}

/// Result type alias for command operations
pub type Result<T> = std::result::Result<T, CommandError>;

impl CommandError {
    /// Create a `ConfigError` from any error type
    pub fn config<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        Self::ConfigError(Box::new(err))
    }

    /// Create an `InvalidPath` error
    pub fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use std::io;

    #[test]
    fn test_conversion_failed_error() {
        let error = CommandError::ConversionFailed {
            failed: 3,
            total: 10,
        };

        let error_msg = error.to_string();
        assert!(error_msg.contains("Conversion failed"));
        assert!(error_msg.contains('3'));
        assert!(error_msg.contains("10"));
    }

    #[test]
    fn test_invalid_path_error() {
        let error = CommandError::invalid_path("/tmp/notes", "not an Obsidian vault");
        let error_msg = error.to_string();
        assert!(error_msg.contains("/tmp/notes"));
        assert!(error_msg.contains("not an Obsidian vault"));
    }

    #[test]
    fn test_not_configured_mentions_setup() {
        let error = CommandError::NotConfigured(PathBuf::from("/home/u/.config/obs2html/config.toml"));
        assert!(error.to_string().contains("obs2html setup"));
    }

    #[test]
    fn test_config_error() {
        let io_error = io::Error::new(io::ErrorKind::InvalidData, "invalid config");
        let error = CommandError::config(io_error);
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: CommandError = io_error.into();
        assert!(error.to_string().contains("IO error"));
    }

    #[test]
    fn test_core_error_conversion() {
        let core_error = obs2html_core::Error::ConverterUnavailable {
            program: "pandoc".to_string(),
            hint: "install it".to_string(),
        };
        let error: CommandError = core_error.into();
        assert!(matches!(error, CommandError::Other(_)));
        assert!(error.to_string().contains("pandoc"));
    }

    #[test]
    fn test_anyhow_error_conversion() {
        let error: CommandError = anyhow::anyhow!("something went wrong").into();
        assert!(error.to_string().contains("something went wrong"));
    }
}
