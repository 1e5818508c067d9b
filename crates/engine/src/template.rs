//! HTML template handling
//!
//! The converter fills the template itself; this module only needs to know
//! which variables the template declares, so frontmatter properties outside
//! that set are never passed along.

use crate::error::{Error, Result};
use indexmap::IndexSet;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::info;

/// Template bundled with the binary, copied to the user's data directory on first use
pub const DEFAULT_TEMPLATE: &str = include_str!("../assets/template.html");

/// Names that are template syntax or filled by the converter, never metadata
const RESERVED: &[&str] = &["if", "elseif", "else", "endif", "for", "endfor", "sep", "it", "body"];

/// `$var$`, `$if(var)$`, `$for(var)$`, `${var}`, `${if(var)}`; `$$` is an escaped dollar
static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\$\$|\$\{(?:(?:if|elseif|for)\(\s*)?([A-Za-z][\w-]*)[^}\n]*\}|\$(?:(?:if|elseif|for)\(\s*)?([A-Za-z][\w-]*)[^$\n]*\$",
    )
    .expect("Failed to compile template variable pattern")
});

/// A template file and the variables it declares
#[derive(Debug, Clone)]
pub struct Template {
    path: PathBuf,
    declared: IndexSet<String>,
}

impl Template {
    /// Read a template from disk
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::from_source(path.to_path_buf(), &source))
    }

    /// Build from template text already in memory
    pub fn from_source(path: PathBuf, source: &str) -> Self {
        Self {
            path,
            declared: declared_keys(source),
        }
    }

    /// Location passed to the converter
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Variables referenced by the template, in order of first use
    pub fn declared_keys(&self) -> &IndexSet<String> {
        &self.declared
    }

    /// Whether the template references `key`
    pub fn declares(&self, key: &str) -> bool {
        self.declared.contains(key)
    }
}

/// Collect the variable names a Pandoc template references
///
/// For dotted access such as `$author.name$` the top-level name is recorded.
pub fn declared_keys(source: &str) -> IndexSet<String> {
    let mut keys = IndexSet::new();
    for caps in VARIABLE.captures_iter(source) {
        let Some(name) = caps.get(1).or_else(|| caps.get(2)) else {
            continue;
        };
        let name = name.as_str();
        if !RESERVED.contains(&name) {
            keys.insert(name.to_string());
        }
    }
    keys
}

/// Write the bundled template to `path` unless a file is already there
///
/// Returns `true` if the file was created.
pub fn ensure_user_template(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreate {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(path, DEFAULT_TEMPLATE).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    info!("Created user template at {}", path.display());
    Ok(true)
}
