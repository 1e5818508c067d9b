//! Error types for obs2html-engine
//!
//! This module defines all error types used by the conversion engine.
//! We use `thiserror` for structured error handling with good error messages.

use obs2html_core::path::RelPath;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for obs2html-engine
#[derive(Error, Debug)]
pub enum Error {
    /// Error reading a file
    #[error("Failed to read file {}: {source}", path.display())]
    FileRead {
        /// File being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Error writing a file
    #[error("Failed to write file {}: {source}", path.display())]
    FileWrite {
        /// File being written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Error copying a file
    #[error("Failed to copy {} to {}: {source}", from.display(), to.display())]
    FileCopy {
        /// Source file
        from: PathBuf,
        /// Destination file
        to: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Error creating a directory
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreate {
        /// Directory being created
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Error walking the vault
    #[error("Failed to walk {}: {source}", path.display())]
    Walk {
        /// Root of the walk
        path: PathBuf,
        /// Underlying error
        #[source]
        source: walkdir::Error,
    },

    /// A note is not valid UTF-8
    #[error("Invalid UTF-8 in {}: {source}", path.display())]
    InvalidUtf8 {
        /// Note with the bad bytes
        path: PathBuf,
        /// Decoding error
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// The converter failed for one note
    #[error("Conversion failed for {path}: {source}")]
    Convert {
        /// Vault-relative path of the note
        path: RelPath,
        /// Converter error
        #[source]
        source: obs2html_core::Error,
    },

    /// Error from the core crate
    #[error(transparent)]
    Core(#[from] obs2html_core::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error means the converter itself is gone
    ///
    /// Every remaining note would fail the same way, so the run stops.
    pub fn is_converter_unavailable(&self) -> bool {
        matches!(
            self,
            Error::Convert {
                source: obs2html_core::Error::ConverterUnavailable { .. },
                ..
            } | Error::Core(obs2html_core::Error::ConverterUnavailable { .. })
        )
    }
}
