//! Base error types for obs2html
//!
//! This module provides the foundation error types that all crates can use.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Base error type for shared functionality
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Path is not absolute
    #[error("Path must be absolute: {path}")]
    PathNotAbsolute {
        /// The offending path
        path: PathBuf,
    },

    /// Path is not relative
    #[error("Path must be relative: {path}")]
    PathNotRelative {
        /// The offending path
        path: PathBuf,
    },

    /// Invalid path prefix
    #[error("Path {} is not under base directory {}", path.display(), base.display())]
    InvalidPathPrefix {
        /// Path that was expected under `base`
        path: Arc<PathBuf>,
        /// Base directory
        base: Arc<PathBuf>,
    },

    /// The external converter could not be found or started
    #[error("Converter '{program}' is not available: {hint}")]
    ConverterUnavailable {
        /// Executable that was looked up
        program: String,
        /// How to install it
        hint: String,
    },

    /// The external converter ran but reported a failure
    #[error("Converter failed ({status}): {stderr}")]
    Converter {
        /// Exit status as reported by the OS
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// Generic error message
    #[error("{0}")]
    Message(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_converter_error_includes_stderr() {
        let err = Error::Converter {
            status: "exit status: 64".to_string(),
            stderr: "Could not find data file templates/user.html".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("exit status: 64"));
        assert!(msg.contains("templates/user.html"));
    }

    #[test]
    fn test_converter_unavailable_mentions_program() {
        let err = Error::ConverterUnavailable {
            program: "pandoc".to_string(),
            hint: "brew install pandoc".to_string(),
        };
        assert!(err.to_string().contains("'pandoc'"));
        assert!(err.to_string().contains("brew install pandoc"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
