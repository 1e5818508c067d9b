//! Vault-wide lookup for wiki link and embed targets
//!
//! Obsidian resolves `[[name]]` against the whole vault, not just the folder
//! of the linking note. The index maps note and attachment names to their
//! vault-relative paths so links can be rewritten to a path relative to the
//! note that contains them.

use crate::walker::{WorkItem, WorkItemKind};
use obs2html_core::path::RelPath;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Index of notes and attachments by name
#[derive(Debug, Clone, Default)]
pub struct LinkIndex {
    /// Lowercased note stem → note paths without extension
    notes_by_stem: HashMap<String, Vec<PathBuf>>,
    /// Lowercased vault path without extension → actual path without extension
    notes_by_path: HashMap<String, PathBuf>,
    /// Lowercased attachment file name → attachment paths
    assets_by_name: HashMap<String, Vec<PathBuf>>,
}

impl LinkIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a conversion plan
    pub fn from_items(items: &[WorkItem]) -> Self {
        let mut index = Self::new();
        for item in items {
            match item.kind {
                WorkItemKind::Note => index.insert_note(&item.rel),
                WorkItemKind::Asset => index.insert_asset(&item.rel),
            }
        }
        index
    }

    /// Register a note
    pub fn insert_note(&mut self, rel: &RelPath) {
        let without_ext = rel.as_path().with_extension("");
        if let Some(stem) = rel.file_stem() {
            self.notes_by_stem
                .entry(stem.to_lowercase())
                .or_default()
                .push(without_ext.clone());
        }
        self.notes_by_path
            .insert(slash_path(&without_ext).to_lowercase(), without_ext);
    }

    /// Register an attachment
    pub fn insert_asset(&mut self, rel: &RelPath) {
        if let Some(name) = rel.file_name() {
            self.assets_by_name
                .entry(name.to_lowercase())
                .or_default()
                .push(rel.as_path().to_path_buf());
        }
    }

    /// Resolve a wiki link page name to an `.html` link relative to `from`
    ///
    /// `from` is the vault-relative path of the note holding the link. Lookup
    /// order: an explicit vault path, a note with that name next to `from`, the
    /// shallowest note with that name anywhere. Unknown pages link to
    /// `<page>.html` beside the current note.
    pub fn resolve_note(&self, page: &str, from: &Path) -> String {
        let from_dir = from.parent().unwrap_or(Path::new(""));
        let key = page.to_lowercase();

        if page.contains('/') {
            return match self.notes_by_path.get(&key) {
                Some(target) => format!("{}.html", relative_link(from_dir, target)),
                None => format!("{page}.html"),
            };
        }

        let Some(candidates) = self.notes_by_stem.get(&key) else {
            return format!("{page}.html");
        };

        let target = candidates
            .iter()
            .find(|candidate| candidate.parent().unwrap_or(Path::new("")) == from_dir)
            .or_else(|| candidates.iter().min_by_key(|c| c.components().count()));

        match target {
            Some(target) => format!("{}.html", relative_link(from_dir, target)),
            None => format!("{page}.html"),
        }
    }

    /// Resolve a bare attachment name to a path relative to `from`
    ///
    /// Returns `None` when no walked attachment has that name.
    pub fn resolve_asset(&self, name: &str, from: &Path) -> Option<String> {
        let from_dir = from.parent().unwrap_or(Path::new(""));
        let candidates = self.assets_by_name.get(&name.to_lowercase())?;
        let target = candidates
            .iter()
            .find(|candidate| candidate.parent().unwrap_or(Path::new("")) == from_dir)
            .or_else(|| candidates.iter().min_by_key(|c| c.components().count()))?;
        Some(relative_link(from_dir, target))
    }
}

/// Join path components with `/` regardless of platform
fn slash_path(path: &Path) -> String {
    components(path).join("/")
}

fn components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Path of `target` as seen from directory `from_dir`, both vault-relative
pub(crate) fn relative_link(from_dir: &Path, target: &Path) -> String {
    let from = components(from_dir);
    let to = components(target);
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<&str> = Vec::with_capacity(from.len() - common + to.len() - common);
    parts.extend(std::iter::repeat_n("..", from.len() - common));
    parts.extend(to[common..].iter().map(String::as_str));
    parts.join("/")
}
