//! Common utilities and types shared across CLI commands

use crate::error::{CommandError, Result};
use obs2html_config::Config;
use std::path::{Path, PathBuf};

/// State shared by all commands
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    /// Location of the configuration file (may not exist yet)
    pub config_path: PathBuf,
}

impl RuntimeContext {
    /// Create a context for the given configuration file
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Whether the configuration file exists
    pub fn config_exists(&self) -> bool {
        self.config_path.is_file()
    }

    /// Load the configuration file
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::NotConfigured`] if the file is missing, or a
    /// configuration error if it cannot be parsed.
    pub fn load_config(&self) -> Result<Config> {
        if !self.config_exists() {
            return Err(CommandError::NotConfigured(self.config_path.clone()));
        }
        Config::load(&self.config_path).map_err(CommandError::config)
    }
}

/// Find the configuration file: explicit path first, then the XDG default
///
/// # Errors
///
/// Returns an error if no explicit path is given and the home directory is unknown.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(expand_path(path));
    }
    obs2html_config::default_config_file().ok_or_else(|| {
        CommandError::Other(anyhow::anyhow!(
            "Could not determine the configuration directory. Pass --config explicitly."
        ))
    })
}

/// Expand a leading `~` and make the path absolute
pub fn expand_path(path: &Path) -> PathBuf {
    let expanded = expand_tilde(path);
    std::path::absolute(&expanded).unwrap_or(expanded)
}

/// Expand tilde (~) in a path to the home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if !path.as_os_str().as_encoded_bytes().starts_with(b"~") {
        return path.to_path_buf();
    }

    let Some(home) = dirs::home_dir() else {
        return path.to_path_buf();
    };

    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        // "~user" style paths are left alone
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_expand_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_tilde(Path::new("~/vault")), home.join("vault"));
        assert_eq!(expand_tilde(Path::new("~")), home);
        assert_eq!(expand_tilde(Path::new("/abs/path")), PathBuf::from("/abs/path"));
        assert_eq!(expand_tilde(Path::new("~other/x")), PathBuf::from("~other/x"));
    }

    #[test]
    fn test_expand_path_is_absolute() {
        assert!(expand_path(Path::new("relative/dir")).is_absolute());
    }

    #[test]
    fn test_resolve_config_path_explicit() {
        let path = resolve_config_path(Some(Path::new("/etc/obs2html.toml"))).unwrap();
        assert_eq!(path, PathBuf::from("/etc/obs2html.toml"));
    }

    #[test]
    fn test_load_config_missing() {
        let temp = TempDir::new().unwrap();
        let context = RuntimeContext::new(temp.path().join("config.toml"));
        assert!(!context.config_exists());
        assert!(matches!(context.load_config(), Err(CommandError::NotConfigured(_))));
    }

    #[test]
    fn test_load_config_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        Config::with_dirs(temp.path().join("vault"), temp.path().join("site"))
            .save(&path)
            .unwrap();

        let context = RuntimeContext::new(path);
        let config = context.load_config().unwrap();
        assert_eq!(config.vault_dir(), Some(&temp.path().join("vault")));
    }
}
