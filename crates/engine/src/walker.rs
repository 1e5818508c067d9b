//! Vault traversal
//!
//! Produces the list of files to convert or copy. Excluded folders are pruned
//! as whole subtrees, so nothing inside them is ever visited.

use crate::error::{Error, Result};
use obs2html_core::path::{AbsPath, RelPath, is_housekeeping_file};
use std::collections::HashSet;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// What happens to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkItemKind {
    /// Markdown note, converted to HTML
    Note,
    /// Any other file, copied as is
    Asset,
}

/// One file found in the vault
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Note or asset
    pub kind: WorkItemKind,
    /// Path relative to the vault root
    pub rel: RelPath,
    /// Absolute source path
    pub source: AbsPath,
}

/// List every file under `root`, skipping excluded folders
///
/// A folder is excluded when its name matches one of `excluded_folders` at any
/// depth. Entries are returned in file-name order within each folder. Files
/// that cannot be read while walking are logged and skipped; only a failure to
/// read `root` itself is an error.
pub fn plan(root: &AbsPath, excluded_folders: &[String]) -> Result<Vec<WorkItem>> {
    let excluded: HashSet<&str> = excluded_folders.iter().map(String::as_str).collect();
    let mut items = Vec::new();

    let walker = WalkDir::new(root.as_path())
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            if excluded.contains(name.as_ref()) {
                debug!("Skipping excluded folder {}", entry.path().display());
                false
            } else {
                true
            }
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(Error::Walk {
                    path: root.as_path().to_path_buf(),
                    source: e,
                });
            }
            Err(e) => {
                warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };

        if entry.path_is_symlink() {
            debug!("Skipping symlink {}", entry.path().display());
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }

        if is_housekeeping_file(&entry.file_name().to_string_lossy()) {
            continue;
        }

        let source = AbsPath::from_path(entry.path())?;
        let rel = source.strip_prefix(root)?;
        let kind = if rel.has_extension("md") || rel.has_extension("markdown") {
            WorkItemKind::Note
        } else {
            WorkItemKind::Asset
        };

        items.push(WorkItem { kind, rel, source });
    }

    debug!("Planned {} files under {}", items.len(), root);
    Ok(items)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &std::path::Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn listed(items: &[WorkItem]) -> Vec<(String, WorkItemKind)> {
        items
            .iter()
            .map(|item| (item.rel.as_path().to_string_lossy().replace('\\', "/"), item.kind))
            .collect()
    }

    #[test]
    fn test_plan_classifies_and_prunes() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "notes/a.md", "# a");
        write(root, "notes/b.MD", "# b");
        write(root, "notes/pic.png", "png");
        write(root, "private/secret.md", "secret");
        write(root, "deep/private/also.md", "secret");
        write(root, ".obsidian/app.json", "{}");
        write(root, "top.md", "top");
        write(root, ".DS_Store", "");

        let root = AbsPath::new(root.to_path_buf()).unwrap();
        let excluded = vec!["private".to_string(), ".obsidian".to_string()];
        let items = plan(&root, &excluded).unwrap();

        assert_eq!(
            listed(&items),
            vec![
                ("notes/a.md".to_string(), WorkItemKind::Note),
                ("notes/b.MD".to_string(), WorkItemKind::Note),
                ("notes/pic.png".to_string(), WorkItemKind::Asset),
                ("top.md".to_string(), WorkItemKind::Note),
            ]
        );
        assert!(items.iter().all(|item| item.source.as_path().starts_with(root.as_path())));
    }

    #[test]
    fn test_plan_root_name_is_never_excluded() {
        let temp = TempDir::new().unwrap();
        let vault = temp.path().join("private");
        write(&vault, "a.md", "a");

        let root = AbsPath::new(vault).unwrap();
        let items = plan(&root, &["private".to_string()]).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_plan_excluded_file_name_is_kept() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "private", "a file, not a folder");

        let root = AbsPath::new(temp.path().to_path_buf()).unwrap();
        let items = plan(&root, &["private".to_string()]).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, WorkItemKind::Asset);
    }

    #[cfg(unix)]
    #[test]
    fn test_plan_skips_symlinked_files() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "a.md", "# a");
        std::os::unix::fs::symlink(root.join("a.md"), root.join("alias.md")).unwrap();

        let items = plan(&AbsPath::new(root.to_path_buf()).unwrap(), &[]).unwrap();
        assert_eq!(listed(&items), vec![("a.md".to_string(), WorkItemKind::Note)]);
    }

    #[test]
    fn test_plan_missing_root() {
        let root = AbsPath::new(std::env::temp_dir().join("obs2html-missing-vault-root")).unwrap();
        assert!(matches!(plan(&root, &[]), Err(Error::Walk { .. })));
    }
}
