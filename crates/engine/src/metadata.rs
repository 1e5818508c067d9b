//! Template metadata for a single note

use crate::frontmatter::Frontmatter;
use crate::template::Template;
use obs2html_core::Metadata;

/// Key the converter uses for the document title
const TITLE: &str = "title";

/// Build the metadata passed to the converter for one note
///
/// Only variables the template declares are taken from the frontmatter, in
/// template order. A title is always present: the frontmatter `title` when the
/// template declares it and the note sets it, otherwise `fallback_title`
/// (the note's file stem).
pub fn build_metadata(frontmatter: &Frontmatter, template: &Template, fallback_title: &str) -> Metadata {
    let mut metadata = Metadata::new();

    for key in template.declared_keys() {
        if let Some(value) = frontmatter.scalar_string(key) {
            let value = value.trim();
            if !value.is_empty() {
                metadata.insert(key.clone(), value.to_string());
            }
        }
    }

    if !metadata.contains_key(TITLE) {
        metadata.insert(TITLE.to_string(), fallback_title.to_string());
    }

    metadata
}
