//! Type-safe path types and small filesystem helpers
//!
//! - [`AbsPath`]: Absolute filesystem paths (vault root, output root)
//! - [`RelPath`]: Paths relative to the vault root (no leading slash)
//!
//! The walker strips the vault root from every file it visits and joins the
//! resulting [`RelPath`] onto the output root, so the output tree mirrors the
//! vault without any string manipulation.
//!
//! # Examples
//!
//! ```
//! use obs2html_core::path::{AbsPath, RelPath};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let output = AbsPath::new("/srv/site".into())?;
//! let note = RelPath::new("notes/a.md".into())?;
//!
//! let html = output.join(&note.with_extension("html"));
//! assert_eq!(html.as_path().to_str().unwrap(), "/srv/site/notes/a.html");
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File names that operating systems drop into folders on their own
///
/// A destination folder holding only these is still considered empty.
const HOUSEKEEPING_FILES: &[&str] = &[".ds_store", "thumbs.db", "desktop.ini"];

/// An absolute path on the filesystem
///
/// This type guarantees that the path is absolute (starts with `/` on Unix or a drive letter on Windows).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbsPath(PathBuf);

impl AbsPath {
    /// Create a new `AbsPath` from a `PathBuf`
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute.
    ///
    /// # Examples
    ///
    /// ```
    /// use obs2html_core::path::AbsPath;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let abs = AbsPath::new("/home/user/vault".into())?;
    /// assert!(abs.as_path().is_absolute());
    ///
    /// let err = AbsPath::new("relative/path".into());
    /// assert!(err.is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(path: PathBuf) -> Result<Self> {
        if path.is_absolute() {
            Ok(AbsPath(path))
        } else {
            Err(Error::PathNotAbsolute { path })
        }
    }

    /// Create a new `AbsPath` from a reference to a `Path`
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute.
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::new(path.to_path_buf())
    }

    /// Get the underlying `Path`
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Convert to a `PathBuf`
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }

    /// Join with a relative path to create a new absolute path
    pub fn join(&self, rel: &RelPath) -> Self {
        AbsPath(self.0.join(rel.as_path()))
    }

    /// Strip a base directory prefix to get a relative path
    ///
    /// # Errors
    ///
    /// Returns an error if `self` is not under `base`.
    ///
    /// # Examples
    ///
    /// ```
    /// use obs2html_core::path::AbsPath;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let vault = AbsPath::new("/home/user/vault".into())?;
    /// let note = AbsPath::new("/home/user/vault/notes/a.md".into())?;
    /// let rel = note.strip_prefix(&vault)?;
    /// assert_eq!(rel.as_path().to_str().unwrap(), "notes/a.md");
    /// # Ok(())
    /// # }
    /// ```
    pub fn strip_prefix(&self, base: &AbsPath) -> Result<RelPath> {
        self.0
            .strip_prefix(&base.0)
            .map(|p| RelPath(p.to_path_buf()))
            .map_err(|_| Error::InvalidPathPrefix {
                path: std::sync::Arc::new(self.as_path().to_path_buf()),
                base: std::sync::Arc::new(base.as_path().to_path_buf()),
            })
    }
}

/// A path relative to the vault root (no leading slash)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelPath(PathBuf);

impl RelPath {
    /// Create a new `RelPath` from a `PathBuf`
    ///
    /// # Errors
    ///
    /// Returns an error if the path is absolute.
    pub fn new(path: PathBuf) -> Result<Self> {
        if path.is_relative() {
            Ok(RelPath(path))
        } else {
            Err(Error::PathNotRelative { path })
        }
    }

    /// Get the underlying `Path`
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Convert to a `PathBuf`
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }

    /// Get the file name
    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name().and_then(|s| s.to_str())
    }

    /// Get the file name without its extension
    pub fn file_stem(&self) -> Option<&str> {
        self.0.file_stem().and_then(|s| s.to_str())
    }

    /// Return the same path with its extension replaced
    ///
    /// ```
    /// use obs2html_core::path::RelPath;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let note = RelPath::new("daily/2024-01-01.md".into())?;
    /// assert_eq!(note.with_extension("html").as_path().to_str().unwrap(), "daily/2024-01-01.html");
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn with_extension(&self, extension: &str) -> Self {
        RelPath(self.0.with_extension(extension))
    }

    /// Check whether the final component has the given extension (case-insensitive)
    pub fn has_extension(&self, extension: &str) -> bool {
        self.0
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension))
    }
}

impl std::fmt::Display for AbsPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl std::fmt::Display for RelPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Check if a directory exists at `path`
pub fn dir_exists(path: &Path) -> bool {
    path.is_dir()
}

/// Check if a directory named `name` exists directly inside `parent`
///
/// Used to recognise a vault by its `.obsidian` folder.
pub fn subdir_exists(parent: &Path, name: &str) -> bool {
    parent.join(name).is_dir()
}

/// Check if a directory is empty, ignoring OS housekeeping files
///
/// A directory that does not exist yet counts as empty.
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be listed.
pub fn is_dir_empty(path: &Path) -> io::Result<bool> {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(e),
    };

    for entry in entries {
        let name = entry?.file_name();
        if !is_housekeeping_file(&name.to_string_lossy()) {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Check whether a file name is one the operating system creates on its own
pub fn is_housekeeping_file(name: &str) -> bool {
    let name = name.to_lowercase();
    HOUSEKEEPING_FILES.contains(&name.as_str())
}

/// Canonicalize a path that may not exist yet
///
/// The nearest existing ancestor is resolved (following symlinks) and the
/// missing tail is appended unchanged, so a future directory can be compared
/// against a canonical one.
///
/// # Errors
///
/// Returns an error if an existing ancestor cannot be canonicalized.
pub fn canonicalize_existing_prefix(path: &Path) -> io::Result<PathBuf> {
    let path = std::path::absolute(path)?;
    let mut existing = path.as_path();
    let mut tail = Vec::new();

    loop {
        match fs::canonicalize(existing) {
            Ok(resolved) => {
                return Ok(tail.iter().rev().fold(resolved, |acc, part| acc.join(part)));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let (Some(parent), Some(name)) = (existing.parent(), existing.file_name()) else {
                    return Err(e);
                };
                tail.push(name);
                existing = parent;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Normalize a directory path typed (or dragged) into a prompt
///
/// Trims surrounding whitespace and one pair of matching quotes, then strips
/// trailing separators. A bare root separator is kept as is.
///
/// ```
/// use obs2html_core::path::remove_trailing_slash;
///
/// assert_eq!(remove_trailing_slash("/home/user/vault/"), "/home/user/vault");
/// assert_eq!(remove_trailing_slash("'/home/user/My Vault' "), "/home/user/My Vault");
/// assert_eq!(remove_trailing_slash("/"), "/");
/// ```
pub fn remove_trailing_slash(input: &str) -> String {
    let mut s = input.trim();

    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            s = &s[1..s.len() - 1];
            break;
        }
    }

    let trimmed = s.trim_end_matches(is_separator);
    if trimmed.is_empty() && !s.is_empty() {
        // Root directory: keep a single separator
        return s[..1].to_string();
    }
    trimmed.to_string()
}

fn is_separator(c: char) -> bool {
    c == '/' || (cfg!(windows) && c == '\\')
}
