//! Configuration management
//!
//! This module handles loading, saving and validating obs2html configuration.
//!
//! ```toml
//! [general]
//! vaultDir = "~/Documents/Vault"
//! outputDir = "~/Sites/notes"
//!
//! [exclude]
//! folders = ["_excalidraw", "_resources", "_templates", ".obsidian", ".trash"]
//! frontmatterProperties = ["private"]
//!
//! [convert]
//! resourceDir = "_resources"
//! ```

use crate::Result;
use obs2html_core::Error;
use obs2html_core::path::canonicalize_existing_prefix;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory names skipped by default
pub const DEFAULT_EXCLUDED_FOLDERS: &[&str] =
    &["_excalidraw", "_resources", "_templates", ".obsidian", ".trash"];

/// General configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Obsidian vault to read from
    #[serde(default, rename = "vaultDir")]
    pub vault_dir: Option<PathBuf>,

    /// Directory the HTML tree is written to
    #[serde(default, rename = "outputDir")]
    pub output_dir: Option<PathBuf>,

    /// HTML template handed to the converter
    ///
    /// Defaults to `$XDG_DATA_HOME/obs2html/templates/user.html`.
    #[serde(default)]
    pub template: Option<PathBuf>,

    /// Converter executable (name on `PATH` or absolute path)
    #[serde(default = "default_pandoc")]
    pub pandoc: String,

    /// Show progress bars
    #[serde(default = "default_true")]
    pub progress: bool,

    /// Copy source creation times onto written files
    #[serde(default = "default_true", rename = "preserveTimestamps")]
    pub preserve_timestamps: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            vault_dir: None,
            output_dir: None,
            template: None,
            pandoc: default_pandoc(),
            progress: true,
            preserve_timestamps: true,
        }
    }
}

/// Exclusion rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcludeConfig {
    /// Directory names that are never descended into
    #[serde(default = "default_excluded_folders")]
    pub folders: Vec<String>,

    /// Notes whose frontmatter sets one of these keys to a truthy value are skipped
    #[serde(default, rename = "frontmatterProperties")]
    pub frontmatter_properties: Vec<String>,
}

impl Default for ExcludeConfig {
    fn default() -> Self {
        Self {
            folders: default_excluded_folders(),
            frontmatter_properties: Vec::new(),
        }
    }
}

/// Conversion options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Vault-relative folder that bare image embeds resolve against
    #[serde(default = "default_resource_dir", rename = "resourceDir")]
    pub resource_dir: String,

    /// Inline images and stylesheets into the generated HTML
    #[serde(default = "default_true", rename = "embedResources")]
    pub embed_resources: bool,

    /// Treat converter warnings (e.g. a missing image) as failures
    #[serde(default = "default_true", rename = "failIfWarnings")]
    pub fail_if_warnings: bool,

    /// Treat every newline in a paragraph as a line break, like Obsidian does
    #[serde(default = "default_true", rename = "hardLineBreaks")]
    pub hard_line_breaks: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            resource_dir: default_resource_dir(),
            embed_resources: true,
            fail_if_warnings: true,
            hard_line_breaks: true,
        }
    }
}

/// obs2html configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// General configuration section
    #[serde(default)]
    pub general: GeneralConfig,

    /// Exclusion rules
    #[serde(default)]
    pub exclude: ExcludeConfig,

    /// Conversion options
    #[serde(default)]
    pub convert: ConvertConfig,
}

/// Paths checked by [`Config::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPaths {
    /// Existing vault directory
    pub vault_dir: PathBuf,
    /// Output directory (may not exist yet)
    pub output_dir: PathBuf,
    /// Template file
    pub template: PathBuf,
}

fn default_true() -> bool {
    true
}

fn default_pandoc() -> String {
    "pandoc".to_string()
}

fn default_resource_dir() -> String {
    "_resources".to_string()
}

fn default_excluded_folders() -> Vec<String> {
    DEFAULT_EXCLUDED_FOLDERS
        .iter()
        .map(ToString::to_string)
        .collect()
}

impl Config {
    /// Create a configuration for a vault and output directory with default settings
    #[must_use]
    pub fn with_dirs(vault_dir: PathBuf, output_dir: PathBuf) -> Self {
        let mut config = Self::default();
        config.general.vault_dir = Some(vault_dir);
        config.general.output_dir = Some(output_dir);
        config
    }

    /// Load configuration from a file
    ///
    /// Relative paths in the file are resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or TOML parsing fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Message(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_toml_str(&content, base).map_err(|e| {
            Error::Message(format!(
                "{e}\nThe configuration file {} appears to be invalid. \
                 Delete it and run `obs2html setup` to create a new one.",
                path.display()
            ))
        })
    }

    /// Load configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns error if TOML parsing fails
    pub fn from_toml_str(toml_content: &str, base_dir: &Path) -> Result<Self> {
        let mut config: Self = toml::from_str(toml_content)
            .map_err(|e| Error::Message(format!("Failed to parse config TOML: {e}")))?;

        config.resolve_relative_paths(base_dir);

        Ok(config)
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file write fails
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Message(format!("Failed to serialize config: {e}")))?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Message(format!(
                    "Failed to create config directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        fs::write(path.as_ref(), content).map_err(|e| {
            Error::Message(format!(
                "Failed to write config file {}: {e}",
                path.as_ref().display()
            ))
        })?;

        Ok(())
    }

    /// Resolve relative paths in configuration
    ///
    /// Expands `~/` to the home directory and joins relative paths onto `base_dir`.
    fn resolve_relative_paths(&mut self, base_dir: &Path) {
        if let Some(ref vault) = self.general.vault_dir {
            self.general.vault_dir = Some(Self::resolve_path(vault, base_dir));
        }
        if let Some(ref output) = self.general.output_dir {
            self.general.output_dir = Some(Self::resolve_path(output, base_dir));
        }
        if let Some(ref template) = self.general.template {
            self.general.template = Some(Self::resolve_path(template, base_dir));
        }
        // Note: resource_dir stays vault-relative, it is written into links
    }

    /// Resolve a single path: expand ~/ and resolve relative paths
    fn resolve_path(path: &Path, base_dir: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();

        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = ::dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~"
            && let Some(home) = ::dirs::home_dir()
        {
            return home;
        }

        if path.is_relative() {
            base_dir.join(path)
        } else {
            path.to_path_buf()
        }
    }

    /// Get the vault directory
    #[must_use]
    pub fn vault_dir(&self) -> Option<&PathBuf> {
        self.general.vault_dir.as_ref()
    }

    /// Get the output directory
    #[must_use]
    pub fn output_dir(&self) -> Option<&PathBuf> {
        self.general.output_dir.as_ref()
    }

    /// Get the template path, falling back to the XDG default
    #[must_use]
    pub fn template_path(&self) -> Option<PathBuf> {
        self.general
            .template
            .clone()
            .or_else(crate::dirs::default_template_file)
    }

    /// Check that the configured paths can be used for a run
    ///
    /// The vault must exist. The output directory may be missing (it is
    /// created on demand) but must not live inside the vault, or the next
    /// run would pick up the generated HTML as vault content.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first problem found
    pub fn validate(&self) -> Result<ValidatedPaths> {
        let vault_dir = self.vault_dir().cloned().ok_or_else(|| {
            Error::Message("No vault directory configured (general.vaultDir)".to_string())
        })?;
        let output_dir = self.output_dir().cloned().ok_or_else(|| {
            Error::Message("No output directory configured (general.outputDir)".to_string())
        })?;

        if !vault_dir.is_dir() {
            return Err(Error::Message(format!(
                "Vault directory does not exist: {}",
                vault_dir.display()
            )));
        }
        if output_dir.exists() && !output_dir.is_dir() {
            return Err(Error::Message(format!(
                "Output path exists but is not a directory: {}",
                output_dir.display()
            )));
        }

        let vault_canonical = fs::canonicalize(&vault_dir)?;
        let output_canonical = canonicalize_existing_prefix(&output_dir)?;
        if output_canonical.starts_with(&vault_canonical) {
            return Err(Error::Message(format!(
                "Output directory {} must not be inside the vault {}",
                output_dir.display(),
                vault_dir.display()
            )));
        }

        let template = self.template_path().ok_or_else(|| {
            Error::Message(
                "Could not determine template path. Set general.template in the config file."
                    .to_string(),
            )
        })?;

        Ok(ValidatedPaths {
            vault_dir,
            output_dir,
            template,
        })
    }
}
